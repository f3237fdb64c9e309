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

use std::fmt;

use crate::common::config::AppConfig;

/// Physical position of a compute node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSelector {
    Blade { chassis_id: String, blade_id: String },
    Rack { rack_id: String },
}

impl NodeSelector {
    /// Distinguished name of the node in the management tree.
    pub fn dn(&self) -> String {
        match self {
            Self::Blade {
                chassis_id,
                blade_id,
            } => format!("sys/chassis-{chassis_id}/blade-{blade_id}"),
            Self::Rack { rack_id } => format!("sys/rack-unit-{rack_id}"),
        }
    }
}

impl fmt::Display for NodeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dn())
    }
}

/// DN of the SAS storage controller that holds a node's local disks.
pub fn storage_controller_dn(node_dn: &str) -> String {
    format!("{node_dn}/{}", AppConfig::STORAGE_CONTROLLER_RN)
}
