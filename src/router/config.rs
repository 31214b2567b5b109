// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Router connection configuration

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::DEFAULT_USER_AGENT;

/// Environment variable holding the router host
pub const ENV_HOST: &str = "TPLINK_HOST";
/// Environment variable holding the admin password
pub const ENV_PASSWORD: &str = "TPLINK_PASSWORD";
/// Environment variable overriding the admin user name
pub const ENV_USER: &str = "TPLINK_USER";

/// Admin account the web interface ships with
pub const DEFAULT_USER: &str = "admin";

/// Rule listing and mutation endpoint
pub const VIRTUAL_SERVER_PATH: &str = "/userRpm/VirtualServerRpm.htm";
/// Menu frame; the router rejects userRpm pages without it as referer
pub const MENU_PATH: &str = "/userRpm/MenuRpm.htm";

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Host, optionally with scheme and port (`192.168.0.1`, `http://10.0.0.1:8080`)
    pub host: String,
    /// Admin user name
    pub user: String,
    /// Admin password
    pub password: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Upper bound on listing pages walked
    pub max_pages: u32,
}

impl RouterConfig {
    /// Create a config for a host and password with default settings
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: DEFAULT_USER.to_string(),
            password: password.into(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: 64,
        }
    }

    /// Build a config from `TPLINK_HOST`, `TPLINK_PASSWORD` and optional `TPLINK_USER`
    pub fn from_env() -> Result<Self> {
        let host = require_env(ENV_HOST)?;
        let password = require_env(ENV_PASSWORD)?;

        let mut config = Self::new(host, password);
        if let Ok(user) = env::var(ENV_USER) {
            if !user.is_empty() {
                config.user = user;
            }
        }
        Ok(config)
    }

    /// Set admin user
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set admin password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the listing page cap
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Router root, with `http://` added when the host has no scheme
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        }
    }

    /// URL of the login probe
    pub fn root_url(&self) -> String {
        format!("{}/", self.base_url())
    }

    /// URL of the virtual server page
    pub fn server_url(&self) -> String {
        format!("{}{}", self.base_url(), VIRTUAL_SERVER_PATH)
    }

    /// URL sent as referer on userRpm requests
    pub fn menu_url(&self) -> String {
        format!("{}{}", self.base_url(), MENU_PATH)
    }

    /// Check the config before any request goes out
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::config("router host is empty"));
        }
        if self.user.is_empty() {
            return Err(Error::config("admin user is empty"));
        }
        if self.max_pages == 0 {
            return Err(Error::config("max_pages must be at least 1"));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::config(format!("{} is not set", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_config() {
        let config = RouterConfig::new("192.168.0.1", "secret")
            .user("root")
            .timeout(Duration::from_secs(5));

        assert_eq!(config.user, "root");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_pages, 64);
    }

    #[test]
    fn test_urls_without_scheme() {
        let config = RouterConfig::new("192.168.0.1", "secret");

        assert_eq!(config.root_url(), "http://192.168.0.1/");
        assert_eq!(
            config.server_url(),
            "http://192.168.0.1/userRpm/VirtualServerRpm.htm"
        );
        assert_eq!(config.menu_url(), "http://192.168.0.1/userRpm/MenuRpm.htm");
    }

    #[test]
    fn test_urls_with_scheme() {
        let config = RouterConfig::new("http://127.0.0.1:8080/", "secret");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_validate() {
        assert!(RouterConfig::new("", "x").validate().is_err());
        assert!(RouterConfig::new("h", "x").max_pages(0).validate().is_err());
        assert!(RouterConfig::new("h", "x").validate().is_ok());
    }
}
