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

//! Unified error types for the ucs-ansible library.
//!
//! Every failure a module can hit, from a bad argument to an error response
//! from UCS Manager, is one variant of [`enum@Error`]. The module runner
//! collapses all of them into a single "setup error" message for Ansible.
//!
//! # Example
//!
//! ```rust,no_run
//! use ucs_ansible::{Error, Result};
//!
//! fn require_ip(ip: Option<&str>) -> Result<&str> {
//!     ip.ok_or_else(|| Error::InvalidArgument("ucs_ip is required".to_string()))
//! }
//! ```

use thiserror::Error;

/// The main error type for ucs-ansible operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A module parameter is missing, unknown or out of range.
    #[error("{0}")]
    InvalidArgument(String),

    /// The session could not be established or is not usable.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Transport failure while talking to the XML API endpoint.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// UCS Manager answered with an error response.
    ///
    /// `code` is the `errorCode` attribute, `description` the `errorDescr`.
    #[error("{code}: {description}")]
    Api { code: String, description: String },

    /// A request could not be encoded or a response could not be decoded.
    #[error("XML error: {0}")]
    Xml(String),

    /// No compute node exists at the resolved DN.
    #[error("server {0} does not exist")]
    NodeNotFound(String),

    /// The compute node has no service profile assigned.
    #[error("server {0} is not associated to a service profile")]
    NotAssociated(String),

    /// The assigned service profile could not be resolved.
    #[error("service profile {0} does not exist")]
    ProfileNotFound(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}

/// A specialized Result type for ucs-ansible operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NodeNotFound("sys/rack-unit-9".to_string());
        assert_eq!(err.to_string(), "server sys/rack-unit-9 does not exist");

        let err = Error::NotAssociated("sys/chassis-1/blade-2".to_string());
        assert_eq!(
            err.to_string(),
            "server sys/chassis-1/blade-2 is not associated to a service profile"
        );

        let err = Error::Api {
            code: "551".to_string(),
            description: "Authorization failed".to_string(),
        };
        assert_eq!(err.to_string(), "551: Authorization failed");

        let err = Error::Connection("not logged in".to_string());
        assert_eq!(err.to_string(), "Connection error: not logged in");

        let err = Error::InvalidArgument("missing required arguments: state".to_string());
        assert_eq!(err.to_string(), "missing required arguments: state");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
