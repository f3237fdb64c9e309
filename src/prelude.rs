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

//! Common re-exports for driving UCS Manager from Rust.
//!
//! ```rust,no_run
//! use ucs_ansible::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let params = ConnectionParams {
//!     ip: "192.168.242.149".to_string(),
//!     username: "admin".to_string(),
//!     password: "password".to_string(),
//!     ..Default::default()
//! };
//! let mut handle = UcsHandle::new(&params)?;
//! handle.login().await?;
//! let inventory = collect_inventory(&handle).await;
//! handle.logout().await?;
//! println!("{} nodes", inventory?.len());
//! # Ok(())
//! # }
//! ```

pub use crate::error::{Error, Result};

pub use crate::ucs::{ConnectionParams, ManagedObject, NodeSelector, UcsHandle, UcsSession};

pub use crate::inventory::{collect_inventory, format_size, Inventory, InventoryRecord};

pub use crate::power::{set_power, PowerRequest, PowerState};

pub use crate::module::{ModuleKind, ModuleParams, ModuleResult};
