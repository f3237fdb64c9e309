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

use crate::error::{Error, Result};
use crate::mock::fixture::MockUcs;
use crate::ucs::mo::ManagedObject;
use crate::ucs::session::{ClassQueryResult, UcsSession};

/// A [`UcsSession`] backed by an in-memory domain.
///
/// Counts logins, logouts and commits so tests can assert on side effects.
/// `fail_on` injects an API error into the next query touching a DN that
/// contains the given text.
#[derive(Debug, Default)]
pub struct MockSession {
    pub ucs: MockUcs,
    pub logged_in: bool,
    pub logins: usize,
    pub logouts: usize,
    pub commits: usize,
    pub fail_login: bool,
    pub fail_on: Option<String>,
    staged: Vec<ManagedObject>,
}

impl MockSession {
    pub fn new(ucs: MockUcs) -> Self {
        Self {
            ucs,
            ..Default::default()
        }
    }

    /// A session that is already authenticated.
    pub fn logged_in(ucs: MockUcs) -> Self {
        Self {
            logged_in: true,
            ..Self::new(ucs)
        }
    }

    pub fn failing_on(mut self, dn_fragment: &str) -> Self {
        self.fail_on = Some(dn_fragment.to_string());
        self
    }

    fn check(&self, dn: &str) -> Result<()> {
        if !self.logged_in {
            return Err(Error::Api {
                code: "552".to_string(),
                description: "Authorization required".to_string(),
            });
        }
        match &self.fail_on {
            Some(fragment) if dn.contains(fragment.as_str()) => Err(Error::Api {
                code: "103".to_string(),
                description: format!("injected failure for {dn}"),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl UcsSession for MockSession {
    async fn login(&mut self) -> Result<()> {
        if self.fail_login {
            return Err(Error::Api {
                code: "551".to_string(),
                description: "Authorization failed".to_string(),
            });
        }
        self.logged_in = true;
        self.logins += 1;
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.logged_in = false;
        self.logouts += 1;
        Ok(())
    }

    async fn query_classids(&self, class_ids: &[&str]) -> Result<ClassQueryResult> {
        self.check("")?;
        Ok(class_ids
            .iter()
            .map(|id| (id.to_string(), self.ucs.by_class(id)))
            .collect())
    }

    async fn query_dn(&self, dn: &str) -> Result<Option<ManagedObject>> {
        self.check(dn)?;
        Ok(self.ucs.get(dn).cloned())
    }

    async fn query_children(&self, in_dn: &str, class_id: &str) -> Result<Vec<ManagedObject>> {
        self.check(in_dn)?;
        Ok(self.ucs.children(in_dn, class_id))
    }

    fn set_mo(&mut self, mo: ManagedObject) {
        self.staged.push(mo);
    }

    async fn commit(&mut self) -> Result<()> {
        let staged = std::mem::take(&mut self.staged);
        for mo in &staged {
            self.check(mo.dn())?;
        }
        for mo in &staged {
            self.ucs.apply(mo);
        }
        self.commits += 1;
        Ok(())
    }

    fn endpoint(&self) -> String {
        "mock://ucs".to_string()
    }
}
