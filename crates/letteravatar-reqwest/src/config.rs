//! Probe client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default timeout for existence checks: 5 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the remote avatar probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestProbeConfig {
    /// Remote avatar check timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "probe-timeout", env = "PROBE_TIMEOUT", default_value = "5")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "probe-user-agent", env = "PROBE_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ReqwestProbeConfig {
    fn default() -> Self {
        Self {
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ReqwestProbeConfig {
    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|user_agent| !user_agent.is_empty())
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("letteravatar/{}", env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReqwestProbeConfig::default();
        assert_eq!(config.http_timeout, 5);
        assert!(config.user_agent.is_none());
        assert_eq!(config.effective_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_effective_timeout_uses_default_when_zero() {
        let config = ReqwestProbeConfig {
            http_timeout: 0,
            ..ReqwestProbeConfig::default()
        };
        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_effective_user_agent() {
        let config = ReqwestProbeConfig::default();
        assert!(config.effective_user_agent().starts_with("letteravatar/"));

        let config = ReqwestProbeConfig {
            user_agent: Some("blog/1.0".to_owned()),
            ..config
        };
        assert_eq!(config.effective_user_agent(), "blog/1.0");

        let config = ReqwestProbeConfig {
            user_agent: Some(String::new()),
            ..config
        };
        assert!(config.effective_user_agent().starts_with("letteravatar/"));
    }
}
