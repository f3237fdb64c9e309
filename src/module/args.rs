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

//! Module arguments as written by Ansible.
//!
//! The arguments file is a flat JSON object. Keys starting with `_ansible_`
//! describe the run (check mode, no_log, ...) and are split off into
//! [`AnsibleContext`]; everything else is a module parameter.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::common::config::AppConfig;
use crate::error::{Error, Result};
use crate::ucs::ConnectionParams;

pub const NO_LOG_PLACEHOLDER: &str = "VALUE_SPECIFIED_IN_NO_LOG_PARAMETER";

/// Parameters never echoed back or logged.
pub const NO_LOG_PARAMS: [&str; 1] = ["ucs_password"];

/// Connection parameters shared by every module.
pub const CONNECTION_PARAMS: [&str; 7] = [
    "ucs_server",
    "ucs_ip",
    "ucs_username",
    "ucs_password",
    "ucs_port",
    "ucs_secure",
    "ucs_proxy",
];

const ANSIBLE_PREFIX: &str = "_ansible_";
const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";

/// Run-level settings passed by Ansible next to the module parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnsibleContext {
    pub check_mode: bool,
    pub no_log: bool,
}

impl AnsibleContext {
    fn absorb(&mut self, key: &str, value: &Value) {
        match key {
            "check_mode" => self.check_mode = value_as_bool(value).unwrap_or(false),
            "no_log" => self.no_log = value_as_bool(value).unwrap_or(false),
            // verbosity, debug, module_name, ...: accepted, unused
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModuleParams {
    pub params: Map<String, Value>,
    pub context: AnsibleContext,
}

impl ModuleParams {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidArgument(format!(
                "failed to read module arguments from {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            Error::InvalidArgument(format!("module arguments are not valid JSON: {e}"))
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(Error::InvalidArgument(
                "module arguments must be a JSON object".to_string(),
            ));
        };
        if object.len() == 1 {
            if let Some(Value::Object(inner)) = object.remove(WRAPPER_KEY) {
                object = inner;
            }
        }

        let mut params = Map::new();
        let mut context = AnsibleContext::default();
        for (key, value) in object {
            match key.strip_prefix(ANSIBLE_PREFIX) {
                Some(name) => context.absorb(name, &value),
                None => {
                    params.insert(key, value);
                }
            }
        }
        Ok(Self { params, context })
    }

    /// Reject parameters the module does not declare.
    pub fn check_supported(&self, module: &str, supported: &[&str]) -> Result<()> {
        let mut unknown: Vec<&str> = self
            .params
            .keys()
            .map(String::as_str)
            .filter(|key| !supported.contains(key))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }

        unknown.sort_unstable();
        let mut names = supported.to_vec();
        names.sort_unstable();
        Err(Error::InvalidArgument(format!(
            "Unsupported parameters for ({module}) module: {}. Supported parameters include: {}.",
            unknown.join(", "),
            names.join(", ")
        )))
    }

    /// Deserialize the parameters into a typed argument struct.
    ///
    /// Keys the struct does not know are ignored here; see
    /// [`check_supported`](Self::check_supported).
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.params.clone()))
            .map_err(|e| Error::InvalidArgument(e.to_string()))
    }

    /// Parameters with sensitive values masked, for `invocation.module_args`.
    pub fn masked(&self) -> Map<String, Value> {
        let mut params = self.params.clone();
        for key in NO_LOG_PARAMS {
            if let Some(value) = params.get_mut(key) {
                if !value.is_null() {
                    *value = Value::String(NO_LOG_PLACEHOLDER.to_string());
                }
            }
        }
        if let Some(Value::Object(server)) = params.get_mut("ucs_server") {
            if let Some(cookie) = server.get_mut("cookie") {
                *cookie = Value::String(NO_LOG_PLACEHOLDER.to_string());
            }
        }
        params
    }
}

/// Ansible truthiness for strings: yes/no, true/false, on/off, 1/0, y/n, t/f.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" | "1" | "y" | "t" => Some(true),
        "no" | "false" | "off" | "0" | "n" | "f" => Some(false),
        _ => None,
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_bool(s),
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        _ => None,
    }
}

/// Deserializers that accept the loosely typed scalars YAML playbooks
/// produce (`port: 443` vs `port: "443"`, `secure: yes` vs `secure: true`).
pub(crate) mod de {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{parse_bool, value_as_bool};

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(D::Error::custom(format!("expected a string, got {other}"))),
        }
    }

    pub fn opt_port<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u16>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        let port = match &value {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Some(Value::String(s)) => s.trim().parse::<u16>().ok(),
            Some(_) => None,
        };
        match (port, value) {
            (Some(port), _) => Ok(Some(port)),
            (None, Some(value)) => Err(D::Error::custom(format!("invalid port: {value}"))),
            (None, None) => Ok(None),
        }
    }

    pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value_as_bool(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid boolean: {value}"))),
        }
    }

    /// A `yes`/`no` choice; booleans are accepted too.
    pub fn opt_yes_no<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(Value::String(s)) if s == "yes" => Ok(Some(true)),
            Some(Value::String(s)) if s == "no" => Ok(Some(false)),
            Some(Value::String(s)) if parse_bool(&s).is_some() => Ok(parse_bool(&s)),
            Some(other) => {
                let got = other.as_str().map(str::to_string).unwrap_or(other.to_string());
                Err(D::Error::custom(format!(
                    "value of display must be one of: yes, no, got: {got}"
                )))
            }
        }
    }
}

/// An existing, already authenticated session handed over by the caller.
#[derive(Clone, Deserialize)]
pub struct ServerRef {
    #[serde(deserialize_with = "de::opt_string", default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub cookie: Option<String>,
    #[serde(deserialize_with = "de::opt_port", default)]
    pub port: Option<u16>,
    #[serde(deserialize_with = "de::opt_bool", default)]
    pub secure: Option<bool>,
    #[serde(default)]
    pub proxy: Option<String>,
}

impl fmt::Debug for ServerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerRef")
            .field("ip", &self.ip)
            .field("cookie", &self.cookie.as_ref().map(|_| "********"))
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("proxy", &self.proxy)
            .finish()
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct ConnectionArgs {
    #[serde(default)]
    pub ucs_server: Option<ServerRef>,
    #[serde(deserialize_with = "de::opt_string", default)]
    pub ucs_ip: Option<String>,
    #[serde(deserialize_with = "de::opt_string", default)]
    pub ucs_username: Option<String>,
    #[serde(deserialize_with = "de::opt_string", default)]
    pub ucs_password: Option<String>,
    #[serde(deserialize_with = "de::opt_port", default)]
    pub ucs_port: Option<u16>,
    #[serde(deserialize_with = "de::opt_bool", default)]
    pub ucs_secure: Option<bool>,
    #[serde(deserialize_with = "de::opt_string", default)]
    pub ucs_proxy: Option<String>,
}

impl fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("ucs_server", &self.ucs_server)
            .field("ucs_ip", &self.ucs_ip)
            .field("ucs_username", &self.ucs_username)
            .field("ucs_password", &self.ucs_password.as_ref().map(|_| "********"))
            .field("ucs_port", &self.ucs_port)
            .field("ucs_secure", &self.ucs_secure)
            .field("ucs_proxy", &self.ucs_proxy)
            .finish()
    }
}

/// How the module gets its session.
#[derive(Debug, Clone)]
pub enum ConnectionTarget {
    /// Log in with credentials, log out when done.
    Login(ConnectionParams),
    /// Reuse a caller-owned session; never log in or out.
    Reuse {
        params: ConnectionParams,
        cookie: String,
    },
}

impl ConnectionArgs {
    pub fn target(&self) -> Result<ConnectionTarget> {
        if let Some(server) = &self.ucs_server {
            let ip = server
                .ip
                .clone()
                .or_else(|| self.ucs_ip.clone())
                .ok_or_else(|| {
                    Error::InvalidArgument("ucs_server requires an ip".to_string())
                })?;
            let cookie = server
                .cookie
                .clone()
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    Error::InvalidArgument("ucs_server requires a session cookie".to_string())
                })?;
            let params = ConnectionParams {
                ip,
                username: self.username(),
                password: String::new(),
                port: server.port.or(self.ucs_port),
                secure: server.secure.or(self.ucs_secure),
                proxy: server.proxy.clone().or_else(|| self.ucs_proxy.clone()),
            };
            return Ok(ConnectionTarget::Reuse { params, cookie });
        }

        let ip = self
            .ucs_ip
            .clone()
            .filter(|ip| !ip.trim().is_empty())
            .ok_or_else(|| {
                Error::InvalidArgument(
                    "one of the following is required: ucs_ip, ucs_server".to_string(),
                )
            })?;
        Ok(ConnectionTarget::Login(ConnectionParams {
            ip,
            username: self.username(),
            password: self.ucs_password.clone().unwrap_or_default(),
            port: self.ucs_port,
            secure: self.ucs_secure,
            proxy: self.ucs_proxy.clone(),
        }))
    }

    fn username(&self) -> String {
        self.ucs_username
            .clone()
            .unwrap_or_else(|| AppConfig::DEFAULT_USERNAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ansible_keys_are_split_off() {
        let params = ModuleParams::from_value(json!({
            "ucs_ip": "10.0.0.1",
            "_ansible_check_mode": true,
            "_ansible_verbosity": 3,
            "_ansible_module_name": "cisco_ucs_power_set",
        }))
        .unwrap();
        assert_eq!(params.params.len(), 1);
        assert!(params.context.check_mode);
        assert!(!params.context.no_log);
        assert!(!params.params.contains_key("_ansible_verbosity"));
    }

    #[test]
    fn test_wrapped_arguments() {
        let params = ModuleParams::from_json(
            r#"{"ANSIBLE_MODULE_ARGS": {"ucs_ip": "10.0.0.1", "_ansible_check_mode": false}}"#,
        )
        .unwrap();
        assert_eq!(params.params["ucs_ip"], "10.0.0.1");
        assert!(!params.context.check_mode);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(ModuleParams::from_json("[1, 2]").is_err());
        assert!(ModuleParams::from_json("not json").is_err());
    }

    #[test]
    fn test_unsupported_parameters() {
        let params = ModuleParams::from_value(json!({"ucs_ip": "h", "colour": "blue"})).unwrap();
        let err = params
            .check_supported("cisco_ucs_get_inventory", &["ucs_ip", "display"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported parameters for (cisco_ucs_get_inventory) module: colour. \
             Supported parameters include: display, ucs_ip."
        );
    }

    #[test]
    fn test_masked_hides_password_and_cookie() {
        let params = ModuleParams::from_value(json!({
            "ucs_password": "secret",
            "ucs_server": {"ip": "h", "cookie": "c00kie"},
        }))
        .unwrap();
        let masked = Value::Object(params.masked()).to_string();
        assert!(!masked.contains("secret"));
        assert!(!masked.contains("c00kie"));
        assert!(masked.contains(NO_LOG_PLACEHOLDER));
    }

    #[test]
    fn test_connection_defaults() {
        let params = ModuleParams::from_value(json!({
            "ucs_ip": "192.168.242.149",
            "ucs_password": "password",
        }))
        .unwrap();
        let args: ConnectionArgs = params.parse().unwrap();
        match args.target().unwrap() {
            ConnectionTarget::Login(p) => {
                assert_eq!(p.ip, "192.168.242.149");
                assert_eq!(p.username, "admin");
                assert_eq!(p.port, None);
                assert_eq!(p.secure, None);
            }
            other => panic!("expected a login target, got {other:?}"),
        }
    }

    #[test]
    fn test_loose_scalars() {
        let params = ModuleParams::from_value(json!({
            "ucs_ip": "h",
            "ucs_port": "8443",
            "ucs_secure": "no",
        }))
        .unwrap();
        let args: ConnectionArgs = params.parse().unwrap();
        assert_eq!(args.ucs_port, Some(8443));
        assert_eq!(args.ucs_secure, Some(false));

        let params = ModuleParams::from_value(json!({"ucs_port": 70000})).unwrap();
        assert!(params.parse::<ConnectionArgs>().is_err());
    }

    #[test]
    fn test_missing_ip() {
        let err = ConnectionArgs::default().target().unwrap_err();
        assert!(err.to_string().contains("ucs_ip"));
    }

    #[test]
    fn test_server_reference_is_reused() {
        let params = ModuleParams::from_value(json!({
            "ucs_server": {"ip": "10.1.1.1", "cookie": "1700000000/abc", "port": 80},
        }))
        .unwrap();
        let args: ConnectionArgs = params.parse().unwrap();
        match args.target().unwrap() {
            ConnectionTarget::Reuse { params, cookie } => {
                assert_eq!(params.ip, "10.1.1.1");
                assert_eq!(params.port, Some(80));
                assert_eq!(cookie, "1700000000/abc");
            }
            other => panic!("expected a reused session, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
