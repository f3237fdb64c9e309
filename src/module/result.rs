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

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Invocation {
    pub module_args: Map<String, Value>,
}

/// The JSON object a module prints on stdout.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ModuleResult {
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<Invocation>,
}

impl ModuleResult {
    pub fn success(changed: bool) -> Self {
        Self {
            changed,
            ..Default::default()
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            failed: true,
            msg: Some(msg.into()),
            ..Default::default()
        }
    }

    /// Argument problems are reported as is; anything raised while talking
    /// to UCS Manager gets the `Setup error:` prefix.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::InvalidArgument(msg) => Self::failure(msg.as_str()),
            other => Self::failure(format!("Setup error: {other}")),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn with_invocation(mut self, module_args: Map<String, Value>) -> Self {
        self.invocation = Some(Invocation { module_args });
        self
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.failed)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"failed": true, "changed": false, "msg": "failed to encode module result: {}"}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }

    /// Print the result as the single line Ansible reads from stdout.
    pub fn emit(&self) {
        println!("{}", self.to_json());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_failed() {
        let result = ModuleResult::success(false).with_field("ascii_table", "");
        let value: Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(value, json!({"changed": false, "ascii_table": ""}));
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn test_setup_error_prefix() {
        let err = Error::NodeNotFound("sys/rack-unit-9".to_string());
        let result = ModuleResult::from_error(&err);
        assert!(result.failed);
        assert_eq!(
            result.msg.as_deref(),
            Some("Setup error: server sys/rack-unit-9 does not exist")
        );
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_argument_error_has_no_prefix() {
        let err = Error::InvalidArgument("missing required arguments: state".to_string());
        let result = ModuleResult::from_error(&err);
        assert_eq!(result.msg.as_deref(), Some("missing required arguments: state"));
    }

    #[test]
    fn test_invocation_is_serialized() {
        let mut args = Map::new();
        args.insert("ucs_ip".to_string(), json!("10.0.0.1"));
        let result = ModuleResult::success(true).with_invocation(args);
        let value: Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(value["invocation"]["module_args"]["ucs_ip"], "10.0.0.1");
        assert_eq!(value["changed"], true);
    }
}
