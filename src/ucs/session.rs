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

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::ucs::mo::ManagedObject;

/// Objects returned by a class query, grouped by class id.
pub type ClassQueryResult = BTreeMap<String, Vec<ManagedObject>>;

/// An authenticated conversation with one UCS Manager endpoint.
///
/// The XML API client and the in-memory mock both implement this; module
/// logic only ever sees `&mut dyn UcsSession`.
#[async_trait]
pub trait UcsSession: Send + Sync {
    /// Authenticate and keep the session cookie.
    async fn login(&mut self) -> Result<()>;

    /// Release the session cookie.
    async fn logout(&mut self) -> Result<()>;

    /// Every object of the given classes. Each requested class has an entry,
    /// possibly empty.
    async fn query_classids(&self, class_ids: &[&str]) -> Result<ClassQueryResult>;

    /// The object at `dn`, if any.
    async fn query_dn(&self, dn: &str) -> Result<Option<ManagedObject>>;

    /// Direct children of `in_dn` with the given class.
    async fn query_children(&self, in_dn: &str, class_id: &str) -> Result<Vec<ManagedObject>>;

    /// Stage an object, with its children, for the next [`commit`](Self::commit).
    fn set_mo(&mut self, mo: ManagedObject);

    /// Send every staged object in one configuration request.
    async fn commit(&mut self) -> Result<()>;

    /// Endpoint identifier for log lines.
    fn endpoint(&self) -> String;
}
