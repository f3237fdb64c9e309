// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Managed objects as exchanged with UCS Manager.

use std::collections::BTreeMap;

use crate::ucs::xml::XmlElement;

/// Class identifiers used by the modules.
pub mod class {
    pub const COMPUTE_RACK_UNIT: &str = "computeRackUnit";
    pub const COMPUTE_BLADE: &str = "computeBlade";
    pub const STORAGE_LOCAL_DISK: &str = "storageLocalDisk";
    pub const LS_SERVER: &str = "lsServer";
    pub const LS_POWER: &str = "lsPower";
}

/// Attribute names used by the modules.
pub mod attr {
    pub const DN: &str = "dn";
    pub const RN: &str = "rn";
    pub const STATUS: &str = "status";
    pub const SERIAL: &str = "serial";
    pub const MODEL: &str = "model";
    pub const UUID: &str = "uuid";
    pub const ASSOCIATION: &str = "association";
    pub const ASSIGNED_TO_DN: &str = "assignedToDn";
    pub const TOTAL_MEMORY: &str = "totalMemory";
    pub const AVAILABLE_MEMORY: &str = "availableMemory";
    pub const NUM_OF_THREADS: &str = "numOfThreads";
    pub const OPER_POWER: &str = "operPower";
    pub const SIZE: &str = "size";
    pub const STATE: &str = "state";
}

/// One object of the UCS management information tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedObject {
    pub class_id: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<ManagedObject>,
}

impl ManagedObject {
    pub fn new(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: ManagedObject) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Attribute value, or the empty string when the endpoint omitted it.
    pub fn attr_or_empty(&self, name: &str) -> String {
        self.attr(name).unwrap_or_default().to_string()
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn dn(&self) -> &str {
        self.attr(attr::DN).unwrap_or_default()
    }

    /// Relative name: the explicit `rn` attribute or the last DN segment.
    pub fn rn(&self) -> &str {
        match self.attr(attr::RN) {
            Some(rn) => rn,
            None => self.dn().rsplit('/').next().unwrap_or_default(),
        }
    }

    pub fn from_element(element: XmlElement) -> Self {
        Self {
            class_id: element.name,
            attrs: element.attrs,
            children: element
                .children
                .into_iter()
                .map(Self::from_element)
                .collect(),
        }
    }

    pub fn to_element(&self) -> XmlElement {
        XmlElement {
            name: self.class_id.clone(),
            attrs: self.attrs.clone(),
            children: self.children.iter().map(Self::to_element).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rn_prefers_explicit_attribute() {
        let mo = ManagedObject::new(class::LS_POWER)
            .with_attr(attr::DN, "org-root/ls-web/power")
            .with_attr(attr::RN, "power");
        assert_eq!(mo.rn(), "power");

        let mo =
            ManagedObject::new(class::COMPUTE_BLADE).with_attr(attr::DN, "sys/chassis-1/blade-3");
        assert_eq!(mo.rn(), "blade-3");
    }

    #[test]
    fn test_missing_attributes() {
        let mo = ManagedObject::new(class::COMPUTE_RACK_UNIT);
        assert_eq!(mo.dn(), "");
        assert_eq!(mo.attr(attr::SERIAL), None);
        assert_eq!(mo.attr_or_empty(attr::SERIAL), "");
    }

    #[test]
    fn test_element_conversion_keeps_children() {
        let mo = ManagedObject::new(class::LS_SERVER)
            .with_attr(attr::DN, "org-root/ls-web")
            .with_child(ManagedObject::new(class::LS_POWER).with_attr(attr::STATE, "up"));
        let back = ManagedObject::from_element(mo.to_element());
        assert_eq!(back, mo);
    }
}
