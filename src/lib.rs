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

//! Ansible modules for Cisco UCS Manager.
//!
//! Two modules are provided: an inventory collector for rack units and
//! blades, and a power setter for the service profile bound to a node. Both
//! talk to UCS Manager over its XML API.

pub mod cli;
pub mod error;
pub mod inventory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod module;
pub mod power;
pub mod prelude;
pub mod ucs;

pub mod common {
    pub mod config;
    pub mod logging;
}

pub use error::{Error, Result};
