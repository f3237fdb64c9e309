/// Application configuration constants
pub struct AppConfig;

impl AppConfig {
    // Network Configuration
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
    pub const POOL_IDLE_TIMEOUT_SECS: u64 = 60;
    pub const TCP_KEEPALIVE_SECS: u64 = 30;
    pub const DEFAULT_HTTP_PORT: u16 = 80;
    pub const DEFAULT_HTTPS_PORT: u16 = 443;

    // UCS Manager XML API
    pub const XML_API_PATH: &'static str = "/nuova";
    pub const DEFAULT_USERNAME: &'static str = "admin";
    pub const STORAGE_CONTROLLER_RN: &'static str = "board/storage-SAS-1";

    // Logging
    pub const LOG_ENV_VAR: &'static str = "UCS_ANSIBLE_LOG";
    pub const DEFAULT_LOG_FILTER: &'static str = "ucs_ansible=warn";
}

/// Environment-specific configuration
pub struct EnvConfig;

impl EnvConfig {
    /// Port used when the caller did not pick one.
    pub fn default_port(secure: Option<bool>) -> u16 {
        match secure {
            Some(false) => AppConfig::DEFAULT_HTTP_PORT,
            _ => AppConfig::DEFAULT_HTTPS_PORT,
        }
    }

    /// URL scheme for a port/security combination.
    ///
    /// An unset `secure` flag only downgrades to plain HTTP on port 80.
    pub fn scheme(port: u16, secure: Option<bool>) -> &'static str {
        match secure {
            Some(false) => "http",
            None if port == AppConfig::DEFAULT_HTTP_PORT => "http",
            _ => "https",
        }
    }

    /// Log filter directive, `UCS_ANSIBLE_LOG` first, then `RUST_LOG`.
    pub fn log_filter() -> String {
        std::env::var(AppConfig::LOG_ENV_VAR)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| AppConfig::DEFAULT_LOG_FILTER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        assert_eq!(EnvConfig::default_port(None), 443);
        assert_eq!(EnvConfig::default_port(Some(true)), 443);
        assert_eq!(EnvConfig::default_port(Some(false)), 80);
    }

    #[test]
    fn test_scheme() {
        assert_eq!(EnvConfig::scheme(443, None), "https");
        assert_eq!(EnvConfig::scheme(80, None), "http");
        assert_eq!(EnvConfig::scheme(80, Some(true)), "https");
        assert_eq!(EnvConfig::scheme(8443, Some(false)), "http");
        assert_eq!(EnvConfig::scheme(8080, None), "https");
    }
}
