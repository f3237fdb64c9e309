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

//! XML API client for UCS Manager.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::common::config::{AppConfig, EnvConfig};
use crate::error::{Error, Result};
use crate::ucs::mo::{attr, ManagedObject};
use crate::ucs::session::{ClassQueryResult, UcsSession};
use crate::ucs::xml::{request, XmlElement};

/// Where and how to reach a UCS Manager endpoint.
#[derive(Clone, Default)]
pub struct ConnectionParams {
    pub ip: String,
    pub username: String,
    pub password: String,
    pub port: Option<u16>,
    pub secure: Option<bool>,
    pub proxy: Option<String>,
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("ip", &self.ip)
            .field("username", &self.username)
            .field("password", &"********")
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl ConnectionParams {
    pub fn endpoint(&self) -> Result<Url> {
        let port = self
            .port
            .unwrap_or_else(|| EnvConfig::default_port(self.secure));
        let scheme = EnvConfig::scheme(port, self.secure);
        let host = if self.ip.contains(':') && !self.ip.starts_with('[') {
            format!("[{}]", self.ip)
        } else {
            self.ip.clone()
        };

        let raw = format!("{scheme}://{host}:{port}{}", AppConfig::XML_API_PATH);
        Url::parse(&raw)
            .map_err(|e| Error::InvalidArgument(format!("invalid UCS endpoint {raw}: {e}")))
    }
}

pub struct UcsHandle {
    client: reqwest::Client,
    endpoint: Url,
    username: String,
    password: String,
    cookie: Option<String>,
    staged: Vec<ManagedObject>,
}

impl UcsHandle {
    /// A handle that still has to [`login`](UcsSession::login).
    pub fn new(params: &ConnectionParams) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(AppConfig::CONNECTION_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(AppConfig::POOL_IDLE_TIMEOUT_SECS))
            .tcp_keepalive(Duration::from_secs(AppConfig::TCP_KEEPALIVE_SECS))
            // Fabric interconnects ship self-signed certificates.
            .danger_accept_invalid_certs(true);
        if let Some(proxy) = &params.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: params.endpoint()?,
            username: params.username.clone(),
            password: params.password.clone(),
            cookie: None,
            staged: Vec::new(),
        })
    }

    /// A handle bound to an already-authenticated session.
    pub fn with_cookie(params: &ConnectionParams, cookie: impl Into<String>) -> Result<Self> {
        let mut handle = Self::new(params)?;
        handle.cookie = Some(cookie.into());
        Ok(handle)
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    fn session_cookie(&self) -> Result<&str> {
        self.cookie()
            .ok_or_else(|| Error::Connection(format!("not logged in to {}", self.endpoint)))
    }

    async fn send(&self, request: XmlElement) -> Result<XmlElement> {
        debug!(method = %request.name, endpoint = %self.endpoint, "UCS API request");

        let body = request.to_xml()?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;

        let root = XmlElement::parse(&text)?;
        root.check_error()?;
        Ok(root)
    }
}

/// Element sent for a staged object: the object is modified in place and its
/// children are created or modified.
pub fn commit_element(mo: &ManagedObject) -> XmlElement {
    let mut element = mo.to_element();
    element
        .attrs
        .entry(attr::STATUS.to_string())
        .or_insert_with(|| "modified".to_string());
    for child in &mut element.children {
        child
            .attrs
            .entry(attr::STATUS.to_string())
            .or_insert_with(|| "created,modified".to_string());
    }
    element
}

#[async_trait]
impl UcsSession for UcsHandle {
    async fn login(&mut self) -> Result<()> {
        let root = self
            .send(request::login(&self.username, &self.password))
            .await?;
        let cookie = root
            .attr("outCookie")
            .filter(|cookie| !cookie.is_empty())
            .ok_or_else(|| {
                Error::Connection(format!("{} returned no session cookie", self.endpoint))
            })?;
        self.cookie = Some(cookie.to_string());
        debug!(endpoint = %self.endpoint, user = %self.username, "logged in");
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        if let Some(cookie) = self.cookie.take() {
            self.send(request::logout(&cookie)).await?;
            debug!(endpoint = %self.endpoint, "logged out");
        }
        Ok(())
    }

    async fn query_classids(&self, class_ids: &[&str]) -> Result<ClassQueryResult> {
        let cookie = self.session_cookie()?;
        let root = self
            .send(request::resolve_classes(cookie, class_ids))
            .await?;

        let mut result: ClassQueryResult = class_ids
            .iter()
            .map(|id| (id.to_string(), Vec::new()))
            .collect();
        for mo in root.out_objects("outConfigs") {
            result.entry(mo.class_id.clone()).or_default().push(mo);
        }
        Ok(result)
    }

    async fn query_dn(&self, dn: &str) -> Result<Option<ManagedObject>> {
        let cookie = self.session_cookie()?;
        let root = self.send(request::resolve_dn(cookie, dn)).await?;
        Ok(root.out_objects("outConfig").into_iter().next())
    }

    async fn query_children(&self, in_dn: &str, class_id: &str) -> Result<Vec<ManagedObject>> {
        let cookie = self.session_cookie()?;
        let root = self
            .send(request::resolve_children(cookie, in_dn, class_id))
            .await?;
        Ok(root.out_objects("outConfigs"))
    }

    fn set_mo(&mut self, mo: ManagedObject) {
        self.staged.push(mo);
    }

    async fn commit(&mut self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let staged = std::mem::take(&mut self.staged);
        let cookie = self.session_cookie()?;
        let pairs = staged
            .iter()
            .map(|mo| (mo.dn().to_string(), commit_element(mo)))
            .collect();
        self.send(request::conf_mos(cookie, pairs)).await?;
        debug!(endpoint = %self.endpoint, objects = staged.len(), "committed");
        Ok(())
    }

    fn endpoint(&self) -> String {
        self.endpoint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ucs::mo::class;

    fn params(ip: &str) -> ConnectionParams {
        ConnectionParams {
            ip: ip.to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_defaults_to_https() {
        let url = params("192.168.242.149").endpoint().unwrap();
        assert_eq!(url.as_str(), "https://192.168.242.149/nuova");
    }

    #[test]
    fn test_endpoint_plain_http() {
        let mut p = params("ucsm.example.net");
        p.secure = Some(false);
        assert_eq!(p.endpoint().unwrap().as_str(), "http://ucsm.example.net/nuova");

        let mut p = params("ucsm.example.net");
        p.port = Some(8080);
        p.secure = Some(false);
        assert_eq!(
            p.endpoint().unwrap().as_str(),
            "http://ucsm.example.net:8080/nuova"
        );
    }

    #[test]
    fn test_endpoint_ipv6() {
        let url = params("fd00::10").endpoint().unwrap();
        assert_eq!(url.as_str(), "https://[fd00::10]/nuova");
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", params("10.0.0.1"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("10.0.0.1"));
    }

    #[test]
    fn test_commit_element_statuses() {
        let profile = ManagedObject::new(class::LS_SERVER)
            .with_attr(attr::DN, "org-root/ls-web")
            .with_child(
                ManagedObject::new(class::LS_POWER)
                    .with_attr(attr::RN, "power")
                    .with_attr(attr::STATE, "down"),
            );
        let element = commit_element(&profile);
        assert_eq!(element.attr(attr::STATUS), Some("modified"));
        assert_eq!(element.children[0].attr(attr::STATUS), Some("created,modified"));
        assert_eq!(element.children[0].attr(attr::STATE), Some("down"));
    }

    #[tokio::test]
    async fn test_queries_require_login() {
        let handle = UcsHandle::new(&params("127.0.0.1")).unwrap();
        let err = handle.query_dn("sys/rack-unit-1").await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }
}
