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

//! Compute node inventory.
//!
//! Every rack unit and chassis blade becomes one [`InventoryRecord`] keyed by
//! its DN. Local disk statistics come from the node's SAS storage controller.

pub mod size;
pub mod table;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::ucs::dn::storage_controller_dn;
use crate::ucs::mo::{attr, class, ManagedObject};
use crate::ucs::UcsSession;

pub use size::format_size;
pub use table::render_ascii_table;

/// Node classes that make up the inventory.
pub const NODE_CLASSES: [&str; 2] = [class::COMPUTE_RACK_UNIT, class::COMPUTE_BLADE];

pub const TABLE_HEADER: [&str; 12] = [
    "Dn",
    "Serial",
    "Model",
    "UUID",
    "Associated",
    "Assigned to",
    "Total Mem (MB)",
    "Available Mem (MB)",
    "Disks",
    "Total Disk Size",
    "Threads",
    "Power",
];

/// Attributes reported for one compute node.
///
/// Memory and thread values are passed through as reported; UCS Manager uses
/// `unspecified` when it does not know them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub assigned_to_dn: String,
    pub association: String,
    pub oper_power: String,
    pub model: String,
    pub serial: String,
    pub total_mem: String,
    pub num_of_threads: String,
    pub available_mem: String,
    pub uuid: String,
    pub nb_disk: usize,
    pub total_size: String,
}

/// Node DN to record.
pub type Inventory = BTreeMap<String, InventoryRecord>;

/// Output of one inventory run, as returned to Ansible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryReport {
    /// The inventory serialized as a JSON object.
    pub inventory: String,
    /// ASCII table, empty unless requested.
    pub display: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskSummary {
    pub count: usize,
    pub total_size: u64,
}

impl DiskSummary {
    /// Count disks with a numeric size. Disks reporting `unknown` (or any
    /// other non-numeric size) are left out of both count and total.
    pub fn from_disks(disks: &[ManagedObject]) -> Self {
        disks
            .iter()
            .filter_map(|disk| disk.attr(attr::SIZE)?.trim().parse::<u64>().ok())
            .fold(Self::default(), |summary, size| Self {
                count: summary.count + 1,
                total_size: summary.total_size.saturating_add(size),
            })
    }
}

pub async fn disk_summary(session: &dyn UcsSession, node_dn: &str) -> Result<DiskSummary> {
    let disks = session
        .query_children(&storage_controller_dn(node_dn), class::STORAGE_LOCAL_DISK)
        .await?;
    let summary = DiskSummary::from_disks(&disks);
    debug!(
        node = node_dn,
        reported = disks.len(),
        counted = summary.count,
        "local disks"
    );
    Ok(summary)
}

pub async fn node_record(session: &dyn UcsSession, node: &ManagedObject) -> Result<InventoryRecord> {
    let disks = disk_summary(session, node.dn()).await?;

    Ok(InventoryRecord {
        assigned_to_dn: node.attr_or_empty(attr::ASSIGNED_TO_DN),
        association: node.attr_or_empty(attr::ASSOCIATION),
        oper_power: node.attr_or_empty(attr::OPER_POWER),
        model: node.attr_or_empty(attr::MODEL),
        serial: node.attr_or_empty(attr::SERIAL),
        total_mem: node.attr_or_empty(attr::TOTAL_MEMORY),
        num_of_threads: node.attr_or_empty(attr::NUM_OF_THREADS),
        available_mem: node.attr_or_empty(attr::AVAILABLE_MEMORY),
        uuid: node.attr_or_empty(attr::UUID),
        nb_disk: disks.count,
        total_size: format_size(disks.total_size),
    })
}

/// Query every rack unit and blade and build the inventory.
pub async fn collect_inventory(session: &dyn UcsSession) -> Result<Inventory> {
    let nodes = session.query_classids(&NODE_CLASSES).await?;

    let mut inventory = Inventory::new();
    for node in nodes.values().flatten() {
        let record = node_record(session, node).await?;
        inventory.insert(node.dn().to_string(), record);
    }

    info!(
        endpoint = %session.endpoint(),
        nodes = inventory.len(),
        "inventory collected"
    );
    Ok(inventory)
}

pub fn table_row(dn: &str, record: &InventoryRecord) -> Vec<String> {
    vec![
        dn.to_string(),
        record.serial.clone(),
        record.model.clone(),
        record.uuid.clone(),
        record.association.clone(),
        record.assigned_to_dn.clone(),
        record.total_mem.clone(),
        record.available_mem.clone(),
        record.nb_disk.to_string(),
        record.total_size.clone(),
        record.num_of_threads.clone(),
        record.oper_power.clone(),
    ]
}

pub fn render_inventory(inventory: &Inventory) -> String {
    let rows: Vec<Vec<String>> = inventory
        .iter()
        .map(|(dn, record)| table_row(dn, record))
        .collect();
    render_ascii_table(&TABLE_HEADER, &rows)
}

/// Collect the inventory and produce the module outputs.
///
/// Any failure aborts the whole run; no partial inventory is returned.
pub async fn collect(session: &dyn UcsSession, display: bool) -> Result<InventoryReport> {
    let inventory = collect_inventory(session).await?;
    let table = if display {
        render_inventory(&inventory)
    } else {
        String::new()
    };

    Ok(InventoryReport {
        inventory: serde_json::to_string(&inventory)?,
        display: table,
    })
}
