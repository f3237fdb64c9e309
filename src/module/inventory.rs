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

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::inventory::{self, InventoryReport};
use crate::module::args::{de, ConnectionArgs, ModuleParams, CONNECTION_PARAMS};
use crate::module::result::ModuleResult;
use crate::module::runner::{execute, ModuleTask};
use crate::ucs::UcsSession;

pub const MODULE_NAME: &str = "cisco_ucs_get_inventory";

pub fn supported_params() -> Vec<&'static str> {
    let mut names = vec!["display"];
    names.extend(CONNECTION_PARAMS);
    names
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryArgs {
    #[serde(deserialize_with = "de::opt_yes_no", default)]
    pub display: Option<bool>,
}

pub struct InventoryTask {
    pub display: bool,
}

#[async_trait]
impl ModuleTask for InventoryTask {
    type Output = InventoryReport;

    async fn run(&self, session: &mut dyn UcsSession) -> Result<InventoryReport> {
        inventory::collect(session, self.display).await
    }
}

pub fn report_result(report: InventoryReport) -> ModuleResult {
    ModuleResult::success(false)
        .with_field("inventory", report.inventory)
        .with_field("display", report.display)
}

pub async fn run(params: &ModuleParams) -> ModuleResult {
    let prepared = params
        .check_supported(MODULE_NAME, &supported_params())
        .and_then(|()| {
            let connection: ConnectionArgs = params.parse()?;
            let args: InventoryArgs = params.parse()?;
            Ok((connection, args))
        });
    let (connection, args) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => return ModuleResult::from_error(&e),
    };

    let task = InventoryTask {
        display: args.display.unwrap_or(false),
    };
    match execute(&connection, &task).await {
        Ok(report) => report_result(report),
        Err(e) => ModuleResult::from_error(&e),
    }
}
