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

//! HTTP server implementation for the mock XML API

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::common::config::AppConfig;
use crate::mock::fixture::MockUcs;
use crate::ucs::handle::commit_element;
use crate::ucs::mo::ManagedObject;
use crate::ucs::xml::{XmlElement, COOKIE, ERROR_CODE, ERROR_DESCR};

pub struct MockServerState {
    pub ucs: MockUcs,
    pub username: String,
    pub password: String,
    pub sessions: HashSet<String>,
    pub logins: usize,
    pub logouts: usize,
    pub commits: usize,
    next_session: u64,
}

impl MockServerState {
    pub fn new(ucs: MockUcs, username: &str, password: &str) -> Self {
        Self {
            ucs,
            username: username.to_string(),
            password: password.to_string(),
            sessions: HashSet::new(),
            logins: 0,
            logouts: 0,
            commits: 0,
            next_session: 1,
        }
    }

    /// Answer one XML API request.
    pub fn dispatch(&mut self, request: &XmlElement) -> XmlElement {
        let method = request.name.as_str();
        match method {
            "aaaLogin" => return self.login(request),
            "aaaLogout" => return self.logout(request),
            _ => {}
        }

        let cookie = request.attr(COOKIE).unwrap_or_default();
        if !self.sessions.contains(cookie) {
            return error_response(method, cookie, "552", "Authorization required");
        }

        let reply = XmlElement::new(method)
            .with_attr(COOKIE, cookie)
            .with_attr("response", "yes");
        match method {
            "configResolveClasses" => {
                let ids = request
                    .child("inIds")
                    .map(|ids| ids.children.as_slice())
                    .unwrap_or_default();
                let objects = ids
                    .iter()
                    .filter_map(|id| id.attr("value"))
                    .flat_map(|class_id| self.ucs.by_class(class_id));
                reply.with_child(out_configs("outConfigs", objects))
            }
            "configResolveDn" => {
                let dn = request.attr("dn").unwrap_or_default();
                let object = self.ucs.get(dn).cloned();
                reply
                    .with_attr("dn", dn)
                    .with_child(out_configs("outConfig", object))
            }
            "configResolveChildren" => {
                let in_dn = request.attr("inDn").unwrap_or_default();
                let class_id = request.attr("classId").unwrap_or_default();
                let objects = self.ucs.children(in_dn, class_id);
                reply.with_child(out_configs("outConfigs", objects))
            }
            "configConfMos" => {
                let pairs = request
                    .child("inConfigs")
                    .map(|configs| configs.children.clone())
                    .unwrap_or_default();
                let mut out = XmlElement::new("outConfigs");
                for pair in pairs {
                    let key = pair.attr("key").unwrap_or_default().to_string();
                    for object in pair.children {
                        let mo = ManagedObject::from_element(object);
                        self.ucs.apply(&mo);
                    }
                    if let Some(stored) = self.ucs.get(&key) {
                        out = out.with_child(
                            XmlElement::new("pair")
                                .with_attr("key", key.as_str())
                                .with_child(commit_element(stored)),
                        );
                    }
                }
                self.commits += 1;
                reply.with_child(out)
            }
            other => error_response(other, cookie, "101", "unknown method"),
        }
    }

    fn login(&mut self, request: &XmlElement) -> XmlElement {
        let name = request.attr("inName").unwrap_or_default();
        let password = request.attr("inPassword").unwrap_or_default();
        if name != self.username || password != self.password {
            return error_response("aaaLogin", "", "551", "Authorization failed");
        }

        let cookie = format!("1700000000/{:08x}-mock", self.next_session);
        self.next_session += 1;
        self.sessions.insert(cookie.clone());
        self.logins += 1;
        XmlElement::new("aaaLogin")
            .with_attr(COOKIE, "")
            .with_attr("response", "yes")
            .with_attr("outCookie", cookie)
            .with_attr("outRefreshPeriod", "600")
            .with_attr("outPriv", "admin")
    }

    fn logout(&mut self, request: &XmlElement) -> XmlElement {
        let cookie = request.attr("inCookie").unwrap_or_default();
        if !self.sessions.remove(cookie) {
            return error_response("aaaLogout", cookie, "552", "Authorization required");
        }
        self.logouts += 1;
        XmlElement::new("aaaLogout")
            .with_attr(COOKIE, "")
            .with_attr("response", "yes")
            .with_attr("outStatus", "success")
    }
}

pub type SharedMockState = Arc<Mutex<MockServerState>>;

fn out_configs(name: &str, objects: impl IntoIterator<Item = ManagedObject>) -> XmlElement {
    objects
        .into_iter()
        .fold(XmlElement::new(name), |out, mo| out.with_child(mo.to_element()))
}

fn error_response(method: &str, cookie: &str, code: &str, description: &str) -> XmlElement {
    XmlElement::new(method)
        .with_attr(COOKIE, cookie)
        .with_attr("response", "yes")
        .with_attr(ERROR_CODE, code)
        .with_attr("invocationResult", "unidentified-fail")
        .with_attr(ERROR_DESCR, description)
}

/// Handle incoming XML API request
async fn handle_request(State(state): State<SharedMockState>, body: String) -> impl IntoResponse {
    let request = match XmlElement::parse(&body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain")],
                e.to_string(),
            )
        }
    };

    let reply = state
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .dispatch(&request);
    match reply.to_xml() {
        Ok(xml) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/xml")], xml),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            e.to_string(),
        ),
    }
}

pub fn router(state: SharedMockState) -> Router {
    Router::new()
        .route(AppConfig::XML_API_PATH, post(handle_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the mock server and serve it in the background.
///
/// Returns the bound address, which matters when `addr` asks for port 0.
pub async fn spawn_server(
    addr: SocketAddr,
    state: SharedMockState,
) -> std::io::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        "Mock UCS XML API listening on http://{local_addr}{}",
        AppConfig::XML_API_PATH
    );

    let app = router(state);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mock server error: {e}");
        }
    });
    Ok((local_addr, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::fixture::MockNode;
    use crate::ucs::xml::request;

    fn state() -> MockServerState {
        MockServerState::new(
            MockUcs::new().with_node(MockNode::rack(1).serial("RK39")),
            "admin",
            "password",
        )
    }

    fn login(state: &mut MockServerState) -> String {
        let reply = state.dispatch(&request::login("admin", "password"));
        reply.attr("outCookie").unwrap().to_string()
    }

    #[test]
    fn test_login_rejects_bad_password() {
        let mut state = state();
        let reply = state.dispatch(&request::login("admin", "wrong"));
        assert_eq!(reply.attr(ERROR_CODE), Some("551"));
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_queries_need_a_session() {
        let mut state = state();
        let reply = state.dispatch(&request::resolve_dn("bogus", "sys/rack-unit-1"));
        assert_eq!(reply.attr(ERROR_CODE), Some("552"));
    }

    #[test]
    fn test_resolve_dn() {
        let mut state = state();
        let cookie = login(&mut state);

        let reply = state.dispatch(&request::resolve_dn(&cookie, "sys/rack-unit-1"));
        let objects = reply.out_objects("outConfig");
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].attr("serial"), Some("RK39"));

        let reply = state.dispatch(&request::resolve_dn(&cookie, "sys/rack-unit-7"));
        assert!(reply.out_objects("outConfig").is_empty());
    }

    #[test]
    fn test_logout_ends_session() {
        let mut state = state();
        let cookie = login(&mut state);
        state.dispatch(&request::logout(&cookie));
        assert_eq!(state.logouts, 1);

        let reply = state.dispatch(&request::resolve_dn(&cookie, "sys/rack-unit-1"));
        assert_eq!(reply.attr(ERROR_CODE), Some("552"));
    }
}
