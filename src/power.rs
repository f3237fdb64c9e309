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

//! Service profile power control.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::ucs::mo::{attr, class, ManagedObject};
use crate::ucs::{NodeSelector, UcsSession};

/// Relative name of the power child of a service profile.
pub const POWER_RN: &str = "power";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    Up,
    Down,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(Error::InvalidArgument(format!(
                "value of state must be one of: up, down, got: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerRequest {
    pub selector: NodeSelector,
    pub state: PowerState,
}

/// Bring the service profile associated with a node to the requested power
/// state.
///
/// Returns whether a change was needed. Nothing is written when the profile
/// is already in that state, or when `check_mode` is set.
pub async fn set_power(
    session: &mut dyn UcsSession,
    request: &PowerRequest,
    check_mode: bool,
) -> Result<bool> {
    let dn = request.selector.dn();

    let node = session
        .query_dn(&dn)
        .await?
        .ok_or_else(|| Error::NodeNotFound(dn.clone()))?;

    let profile_dn = match node.attr(attr::ASSIGNED_TO_DN) {
        Some(profile_dn) if !profile_dn.trim().is_empty() => profile_dn.to_string(),
        _ => return Err(Error::NotAssociated(dn)),
    };

    let profile = session
        .query_dn(&profile_dn)
        .await?
        .ok_or_else(|| Error::ProfileNotFound(profile_dn.clone()))?;

    let power = session
        .query_children(&profile_dn, class::LS_POWER)
        .await?;
    let current = power.first().and_then(|p| p.attr(attr::STATE));
    debug!(
        node = %dn,
        profile = %profile_dn,
        current = current.unwrap_or("unknown"),
        desired = %request.state,
        "service profile power"
    );

    if current == Some(request.state.as_str()) {
        return Ok(false);
    }

    if check_mode {
        info!(profile = %profile_dn, state = %request.state, "check mode, power change skipped");
        return Ok(true);
    }

    // Only the DN and the power child are sent; the rest of the profile is
    // left untouched.
    let update = ManagedObject::new(profile.class_id)
        .with_attr(attr::DN, profile_dn.as_str())
        .with_child(
            ManagedObject::new(class::LS_POWER)
                .with_attr(attr::DN, format!("{profile_dn}/{POWER_RN}"))
                .with_attr(attr::RN, POWER_RN)
                .with_attr(attr::STATE, request.state.as_str()),
        );
    session.set_mo(update);
    session.commit().await?;

    info!(profile = %profile_dn, state = %request.state, "service profile power changed");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_state_parse() {
        assert_eq!("up".parse::<PowerState>().unwrap(), PowerState::Up);
        assert_eq!("down".parse::<PowerState>().unwrap(), PowerState::Down);

        let err = "sideways".parse::<PowerState>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "value of state must be one of: up, down, got: sideways"
        );
    }

    #[test]
    fn test_power_state_display() {
        assert_eq!(PowerState::Up.to_string(), "up");
        assert_eq!(PowerState::Down.to_string(), "down");
    }
}
