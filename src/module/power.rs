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

use crate::error::{Error, Result};
use crate::module::args::{de, ConnectionArgs, ModuleParams, CONNECTION_PARAMS};
use crate::module::result::ModuleResult;
use crate::module::runner::{execute, ModuleTask};
use crate::power::{set_power, PowerRequest, PowerState};
use crate::ucs::{NodeSelector, UcsSession};

pub const MODULE_NAME: &str = "cisco_ucs_power_set";

pub fn supported_params() -> Vec<&'static str> {
    let mut names = vec!["state", "chassis_id", "blade_id", "rack_id"];
    names.extend(CONNECTION_PARAMS);
    names
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PowerArgs {
    #[serde(deserialize_with = "de::opt_string", default)]
    pub state: Option<String>,
    #[serde(deserialize_with = "de::opt_string", default)]
    pub chassis_id: Option<String>,
    #[serde(deserialize_with = "de::opt_string", default)]
    pub blade_id: Option<String>,
    #[serde(deserialize_with = "de::opt_string", default)]
    pub rack_id: Option<String>,
}

impl PowerArgs {
    pub fn request(&self) -> Result<PowerRequest> {
        let state: PowerState = self
            .state
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument("missing required arguments: state".into()))?
            .parse()?;

        let present = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let selector = match (
            present(&self.chassis_id),
            present(&self.blade_id),
            present(&self.rack_id),
        ) {
            (Some(chassis_id), Some(blade_id), None) => NodeSelector::Blade {
                chassis_id,
                blade_id,
            },
            (None, None, Some(rack_id)) => NodeSelector::Rack { rack_id },
            (chassis, blade, Some(_)) if chassis.is_some() || blade.is_some() => {
                return Err(Error::InvalidArgument(
                    "parameters are mutually exclusive: chassis_id|rack_id".into(),
                ))
            }
            (Some(_), None, None) => {
                return Err(Error::InvalidArgument(
                    "missing node selector: blade_id is required with chassis_id".into(),
                ))
            }
            (None, Some(_), None) => {
                return Err(Error::InvalidArgument(
                    "missing node selector: chassis_id is required with blade_id".into(),
                ))
            }
            _ => {
                return Err(Error::InvalidArgument(
                    "missing node selector: one of chassis_id and blade_id, or rack_id".into(),
                ))
            }
        };
        Ok(PowerRequest { selector, state })
    }
}

pub struct PowerTask {
    pub request: PowerRequest,
    pub check_mode: bool,
}

#[async_trait]
impl ModuleTask for PowerTask {
    type Output = bool;

    async fn run(&self, session: &mut dyn UcsSession) -> Result<bool> {
        set_power(session, &self.request, self.check_mode).await
    }
}

pub async fn run(params: &ModuleParams) -> ModuleResult {
    let prepared = params
        .check_supported(MODULE_NAME, &supported_params())
        .and_then(|()| {
            let connection: ConnectionArgs = params.parse()?;
            let request = params.parse::<PowerArgs>()?.request()?;
            Ok((connection, request))
        });
    let (connection, request) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => return ModuleResult::from_error(&e),
    };

    let task = PowerTask {
        request,
        check_mode: params.context.check_mode,
    };
    match execute(&connection, &task).await {
        Ok(changed) => ModuleResult::success(changed),
        Err(e) => ModuleResult::from_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(
        state: &str,
        chassis: Option<&str>,
        blade: Option<&str>,
        rack: Option<&str>,
    ) -> PowerArgs {
        PowerArgs {
            state: Some(state.to_string()),
            chassis_id: chassis.map(str::to_string),
            blade_id: blade.map(str::to_string),
            rack_id: rack.map(str::to_string),
        }
    }

    #[test]
    fn test_blade_selector() {
        let request = args("up", Some("1"), Some("2"), None).request().unwrap();
        assert_eq!(request.selector.dn(), "sys/chassis-1/blade-2");
        assert_eq!(request.state, PowerState::Up);
    }

    #[test]
    fn test_rack_selector() {
        let request = args("down", None, None, Some("4")).request().unwrap();
        assert_eq!(request.selector.dn(), "sys/rack-unit-4");
    }

    #[test]
    fn test_both_selectors_rejected() {
        let err = args("up", Some("1"), Some("2"), Some("3"))
            .request()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameters are mutually exclusive: chassis_id|rack_id"
        );
    }

    #[test]
    fn test_incomplete_selector_rejected() {
        for a in [
            args("up", Some("1"), None, None),
            args("up", None, Some("1"), None),
            args("up", None, None, None),
        ] {
            let err = a.request().unwrap_err();
            assert!(err.to_string().starts_with("missing node selector"), "{err}");
        }
    }

    #[test]
    fn test_state_validation() {
        let err = args("reboot", None, None, Some("1")).request().unwrap_err();
        assert!(err.to_string().contains("up, down"));

        let missing = PowerArgs {
            rack_id: Some("1".into()),
            ..Default::default()
        };
        assert!(missing.request().is_err());
    }

    #[test]
    fn test_numeric_ids_accepted() {
        let params = ModuleParams::from_value(serde_json::json!({
            "state": "up",
            "chassis_id": 1,
            "blade_id": 3,
        }))
        .unwrap();
        let request = params.parse::<PowerArgs>().unwrap().request().unwrap();
        assert_eq!(request.selector.dn(), "sys/chassis-1/blade-3");
    }
}
