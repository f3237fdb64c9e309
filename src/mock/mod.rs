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

//! Mock UCS Manager for tests and playbook development.
//!
//! [`MockSession`] answers session calls from memory; the server module
//! exposes the same domain over the XML API so the real client can be
//! exercised end to end.

#[cfg(feature = "mock")]
pub mod args;
pub mod fixture;
#[cfg(feature = "mock")]
pub mod server;
pub mod session;

#[cfg(feature = "mock")]
pub use args::Args;
pub use fixture::{MockNode, MockUcs};
#[cfg(feature = "mock")]
pub use server::{spawn_server, MockServerState, SharedMockState};
pub use session::MockSession;
