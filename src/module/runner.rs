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

//! Session scoping for module runs.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Result;
use crate::module::args::{ConnectionArgs, ConnectionTarget};
use crate::ucs::{UcsHandle, UcsSession};

/// The work a module does once a session is available.
#[async_trait]
pub trait ModuleTask: Send + Sync {
    type Output: Send;

    async fn run(&self, session: &mut dyn UcsSession) -> Result<Self::Output>;
}

/// Who is responsible for the session lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionScope {
    /// Logged in for this run and logged out afterwards.
    Owned,
    /// Provided by the caller, left open.
    Borrowed,
}

/// Run `task` inside `scope`.
///
/// An owned session is logged out whether the task succeeds or fails. A
/// failed logout is logged and does not replace the task outcome.
pub async fn run_in_session<T: ModuleTask>(
    session: &mut dyn UcsSession,
    scope: SessionScope,
    task: &T,
) -> Result<T::Output> {
    if scope == SessionScope::Owned {
        session.login().await?;
        debug!(endpoint = %session.endpoint(), "logged in");
    }

    let outcome = task.run(session).await;

    if scope == SessionScope::Owned {
        match session.logout().await {
            Ok(()) => debug!(endpoint = %session.endpoint(), "logged out"),
            Err(e) => warn!(endpoint = %session.endpoint(), "logout failed: {e}"),
        }
    }
    outcome
}

/// Open the XML API session described by `connection` and run `task` in it.
pub async fn execute<T: ModuleTask>(connection: &ConnectionArgs, task: &T) -> Result<T::Output> {
    let (mut handle, scope) = match connection.target()? {
        ConnectionTarget::Login(params) => (UcsHandle::new(&params)?, SessionScope::Owned),
        ConnectionTarget::Reuse { params, cookie } => (
            UcsHandle::with_cookie(&params, cookie)?,
            SessionScope::Borrowed,
        ),
    };
    run_in_session(&mut handle, scope, task).await
}
