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

//! In-memory UCS domain: a flat DN -> object table.

use std::collections::BTreeMap;

use crate::power::{PowerState, POWER_RN};
use crate::ucs::dn::storage_controller_dn;
use crate::ucs::mo::{attr, class, ManagedObject};
use crate::ucs::NodeSelector;

/// Description of one compute node to seed a [`MockUcs`] with.
#[derive(Debug, Clone)]
pub struct MockNode {
    pub selector: NodeSelector,
    pub serial: String,
    pub model: String,
    pub uuid: String,
    pub total_memory: String,
    pub available_memory: String,
    pub threads: String,
    pub oper_power: String,
    pub assigned_to: Option<String>,
    /// Reported disk sizes, `unknown` included.
    pub disks: Vec<String>,
}

impl MockNode {
    fn new(selector: NodeSelector) -> Self {
        Self {
            selector,
            serial: String::new(),
            model: String::new(),
            uuid: String::new(),
            total_memory: "49152".to_string(),
            available_memory: "49152".to_string(),
            threads: "16".to_string(),
            oper_power: "off".to_string(),
            assigned_to: None,
            disks: Vec::new(),
        }
    }

    pub fn rack(rack_id: u32) -> Self {
        Self::new(NodeSelector::Rack {
            rack_id: rack_id.to_string(),
        })
    }

    pub fn blade(chassis_id: u32, blade_id: u32) -> Self {
        Self::new(NodeSelector::Blade {
            chassis_id: chassis_id.to_string(),
            blade_id: blade_id.to_string(),
        })
    }

    pub fn serial(mut self, serial: &str) -> Self {
        self.serial = serial.to_string();
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = uuid.to_string();
        self
    }

    pub fn memory(mut self, total: &str, available: &str) -> Self {
        self.total_memory = total.to_string();
        self.available_memory = available.to_string();
        self
    }

    pub fn threads(mut self, threads: &str) -> Self {
        self.threads = threads.to_string();
        self
    }

    pub fn oper_power(mut self, power: &str) -> Self {
        self.oper_power = power.to_string();
        self
    }

    pub fn assigned_to(mut self, profile_dn: &str) -> Self {
        self.assigned_to = Some(profile_dn.to_string());
        self
    }

    pub fn disks(mut self, sizes: &[&str]) -> Self {
        self.disks = sizes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn dn(&self) -> String {
        self.selector.dn()
    }

    fn class_id(&self) -> &'static str {
        match self.selector {
            NodeSelector::Blade { .. } => class::COMPUTE_BLADE,
            NodeSelector::Rack { .. } => class::COMPUTE_RACK_UNIT,
        }
    }

    fn to_object(&self) -> ManagedObject {
        let (association, assigned) = match &self.assigned_to {
            Some(profile) => ("associated", profile.as_str()),
            None => ("none", ""),
        };
        ManagedObject::new(self.class_id())
            .with_attr(attr::DN, self.dn())
            .with_attr(attr::SERIAL, self.serial.as_str())
            .with_attr(attr::MODEL, self.model.as_str())
            .with_attr(attr::UUID, self.uuid.as_str())
            .with_attr(attr::ASSOCIATION, association)
            .with_attr(attr::ASSIGNED_TO_DN, assigned)
            .with_attr(attr::TOTAL_MEMORY, self.total_memory.as_str())
            .with_attr(attr::AVAILABLE_MEMORY, self.available_memory.as_str())
            .with_attr(attr::NUM_OF_THREADS, self.threads.as_str())
            .with_attr(attr::OPER_POWER, self.oper_power.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockUcs {
    objects: BTreeMap<String, ManagedObject>,
}

impl MockUcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a compute node, its storage controller and its disks.
    pub fn with_node(mut self, node: MockNode) -> Self {
        let node_dn = node.dn();
        let controller_dn = storage_controller_dn(&node_dn);
        for (i, size) in node.disks.iter().enumerate() {
            self.insert(
                ManagedObject::new(class::STORAGE_LOCAL_DISK)
                    .with_attr(attr::DN, format!("{controller_dn}/disk-{}", i + 1))
                    .with_attr(attr::SIZE, size.as_str()),
            );
        }
        self.insert(node.to_object());
        self
    }

    /// Add a service profile, optionally with an `lsPower` child.
    pub fn with_profile(mut self, profile_dn: &str, power: Option<PowerState>) -> Self {
        self.insert(ManagedObject::new(class::LS_SERVER).with_attr(attr::DN, profile_dn));
        if let Some(state) = power {
            self.insert(
                ManagedObject::new(class::LS_POWER)
                    .with_attr(attr::DN, format!("{profile_dn}/{POWER_RN}"))
                    .with_attr(attr::STATE, state.as_str()),
            );
        }
        self
    }

    pub fn insert(&mut self, mo: ManagedObject) {
        self.objects.insert(mo.dn().to_string(), mo);
    }

    pub fn get(&self, dn: &str) -> Option<&ManagedObject> {
        self.objects.get(dn)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn by_class(&self, class_id: &str) -> Vec<ManagedObject> {
        self.objects
            .values()
            .filter(|mo| mo.class_id == class_id)
            .cloned()
            .collect()
    }

    /// Direct children of `parent_dn` with the given class.
    pub fn children(&self, parent_dn: &str, class_id: &str) -> Vec<ManagedObject> {
        let prefix = format!("{parent_dn}/");
        self.objects
            .iter()
            .filter(|(dn, mo)| {
                mo.class_id == class_id
                    && dn
                        .strip_prefix(&prefix)
                        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .map(|(_, mo)| mo.clone())
            .collect()
    }

    /// Merge a configuration write into the table.
    ///
    /// Attributes of an existing object are overwritten one by one; missing
    /// objects are created. Children are placed under the parent by `rn`.
    pub fn apply(&mut self, mo: &ManagedObject) {
        let dn = mo.dn().to_string();
        let entry = self
            .objects
            .entry(dn.clone())
            .or_insert_with(|| ManagedObject::new(mo.class_id.as_str()));
        for (name, value) in &mo.attrs {
            if name != attr::STATUS && name != attr::RN {
                entry.set_attr(name.as_str(), value.as_str());
            }
        }

        for child in &mo.children {
            let mut child = child.clone();
            let child_dn = format!("{dn}/{}", child.rn());
            child.set_attr(attr::DN, child_dn);
            self.apply(&child);
        }
    }

    /// A small mixed domain used by the mock server.
    pub fn sample() -> Self {
        Self::new()
            .with_node(
                MockNode::blade(5, 1)
                    .serial("SRV90")
                    .model("UCSB-B200-M4")
                    .uuid("1b4e28ba-2fa1-11d2-0501-b9a761bde3fb")
                    .disks(&["745417728", "745417728"]),
            )
            .with_node(
                MockNode::blade(3, 1)
                    .serial("SRV84")
                    .model("UCSB-EX-M4-1")
                    .uuid("1b4e28ba-2fa1-11d2-0301-b9a761bde3fb")
                    .threads("32")
                    .assigned_to("org-root/ls-web-01")
                    .oper_power("on")
                    .disks(&["429056", "429056", "unknown"]),
            )
            .with_node(
                MockNode::rack(1)
                    .serial("RK39")
                    .model("UCSC-C220-M4S")
                    .uuid("1b4e28ba-2fa1-11d2-e001-b9a761bde3fb")
                    .assigned_to("org-root/ls-db-01")
                    .disks(&["262144"; 8]),
            )
            .with_node(
                MockNode::rack(2)
                    .serial("RK40")
                    .model("UCSC-C240-M4S")
                    .uuid("1b4e28ba-2fa1-11d2-e002-b9a761bde3fb")
                    .memory("65536", "65536"),
            )
            .with_profile("org-root/ls-web-01", Some(PowerState::Up))
            .with_profile("org-root/ls-db-01", Some(PowerState::Down))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_are_direct_only() {
        let ucs = MockUcs::new().with_node(MockNode::rack(1).disks(&["10", "unknown"]));
        let disks = ucs.children(
            "sys/rack-unit-1/board/storage-SAS-1",
            class::STORAGE_LOCAL_DISK,
        );
        assert_eq!(disks.len(), 2);
        assert!(ucs
            .children("sys/rack-unit-1", class::STORAGE_LOCAL_DISK)
            .is_empty());
    }

    #[test]
    fn test_apply_creates_power_child() {
        let mut ucs = MockUcs::new().with_profile("org-root/ls-a", None);
        let update = ManagedObject::new(class::LS_SERVER)
            .with_attr(attr::DN, "org-root/ls-a")
            .with_attr(attr::STATUS, "modified")
            .with_child(
                ManagedObject::new(class::LS_POWER)
                    .with_attr(attr::RN, POWER_RN)
                    .with_attr(attr::STATE, "up"),
            );
        ucs.apply(&update);

        let power = ucs.get("org-root/ls-a/power").unwrap();
        assert_eq!(power.class_id, class::LS_POWER);
        assert_eq!(power.attr(attr::STATE), Some("up"));
        assert_eq!(ucs.get("org-root/ls-a").unwrap().attr(attr::STATUS), None);
    }

    #[test]
    fn test_node_association() {
        let ucs = MockUcs::new()
            .with_node(MockNode::blade(1, 1))
            .with_node(MockNode::blade(1, 2).assigned_to("org-root/ls-x"));
        let free = ucs.get("sys/chassis-1/blade-1").unwrap();
        assert_eq!(free.attr(attr::ASSOCIATION), Some("none"));
        assert_eq!(free.attr(attr::ASSIGNED_TO_DN), Some(""));
        let used = ucs.get("sys/chassis-1/blade-2").unwrap();
        assert_eq!(used.attr(attr::ASSIGNED_TO_DN), Some("org-root/ls-x"));
    }

    #[test]
    fn test_sample_domain() {
        let ucs = MockUcs::sample();
        assert_eq!(ucs.by_class(class::COMPUTE_BLADE).len(), 2);
        assert_eq!(ucs.by_class(class::COMPUTE_RACK_UNIT).len(), 2);
        assert!(!ucs.is_empty());
    }
}
