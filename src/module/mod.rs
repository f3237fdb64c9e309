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

//! Ansible module entry points.
//!
//! A module run reads the arguments file, validates parameters, opens a UCS
//! Manager session, does its work and prints exactly one JSON result.

pub mod args;
pub mod inventory;
pub mod power;
pub mod result;
pub mod runner;

use std::path::Path;

use tracing::debug;

pub use args::{AnsibleContext, ConnectionArgs, ModuleParams};
pub use result::ModuleResult;
pub use runner::{run_in_session, ModuleTask, SessionScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    GetInventory,
    PowerSet,
}

impl ModuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetInventory => inventory::MODULE_NAME,
            Self::PowerSet => power::MODULE_NAME,
        }
    }

    /// Run the module and attach the masked invocation arguments.
    pub async fn run(&self, params: &ModuleParams) -> ModuleResult {
        debug!(
            module = self.name(),
            check_mode = params.context.check_mode,
            "module run"
        );
        let result = match self {
            Self::GetInventory => inventory::run(params).await,
            Self::PowerSet => power::run(params).await,
        };
        if params.context.no_log {
            result
        } else {
            result.with_invocation(params.masked())
        }
    }

    pub async fn run_file(&self, path: &Path) -> ModuleResult {
        match ModuleParams::from_file(path) {
            Ok(params) => self.run(&params).await,
            Err(e) => ModuleResult::from_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_invocation_is_masked() {
        let params = ModuleParams::from_value(json!({
            "state": "sideways",
            "rack_id": "1",
            "ucs_ip": "192.0.2.1",
            "ucs_password": "hunter2",
        }))
        .unwrap();
        let result = ModuleKind::PowerSet.run(&params).await;
        assert!(result.failed);

        let json = result.to_json();
        assert!(!json.contains("hunter2"));
        assert!(json.contains(args::NO_LOG_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_no_log_drops_invocation() {
        let params = ModuleParams::from_value(json!({
            "state": "up",
            "_ansible_no_log": true,
        }))
        .unwrap();
        let result = ModuleKind::PowerSet.run(&params).await;
        assert!(result.invocation.is_none());
    }

    #[tokio::test]
    async fn test_missing_args_file() {
        let result = ModuleKind::GetInventory
            .run_file(Path::new("/nonexistent/args.json"))
            .await;
        assert!(result.failed);
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_names() {
        assert_eq!(ModuleKind::GetInventory.name(), "cisco_ucs_get_inventory");
        assert_eq!(ModuleKind::PowerSet.name(), "cisco_ucs_power_set");
    }
}
