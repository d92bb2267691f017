use std::path::PathBuf;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Default base URL of the letter image sets.
    pub const ASSETS_BASE_URL: &str = "/assets/images";

    /// Development-only verification secret.
    pub const VERIFICATION_SECRET: &str = "letteravatar-development-secret";

    /// Shortest accepted verification secret.
    pub const MIN_SECRET_LENGTH: usize = 16;
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// JSON file holding the persisted avatar settings.
    ///
    /// Settings are kept in memory when unset.
    #[cfg_attr(feature = "config", arg(long, env = "SETTINGS_PATH"))]
    pub settings_path: Option<PathBuf>,

    /// JSON snapshot of user accounts and anonymous comment authors.
    #[cfg_attr(feature = "config", arg(long, env = "DIRECTORY_PATH"))]
    pub directory_path: Option<PathBuf>,

    /// Base URL the letter image sets are served from.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ASSETS_BASE_URL", default_value = defaults::ASSETS_BASE_URL)
    )]
    pub assets_base_url: String,

    /// Secret keying the verification tokens.
    #[cfg_attr(
        feature = "config",
        arg(
            long,
            env = "VERIFICATION_SECRET",
            default_value = defaults::VERIFICATION_SECRET,
            hide_env_values = true,
            hide_default_value = true
        )
    )]
    pub verification_secret: String,
}

impl ServiceConfig {
    /// Whether the development secret is still in use.
    pub fn uses_development_secret(&self) -> bool {
        self.verification_secret == defaults::VERIFICATION_SECRET
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.verification_secret.len() < defaults::MIN_SECRET_LENGTH {
            return Err(Error::config(format!(
                "verification secret must be at least {} bytes",
                defaults::MIN_SECRET_LENGTH
            )));
        }

        if self.assets_base_url.trim().is_empty() {
            return Err(Error::config("assets base URL must not be empty"));
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            directory_path: None,
            assets_base_url: defaults::ASSETS_BASE_URL.to_owned(),
            verification_secret: defaults::VERIFICATION_SECRET.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.uses_development_secret());
    }

    #[test]
    fn short_secret_is_rejected() {
        let config = ServiceConfig {
            verification_secret: "short".to_owned(),
            ..ServiceConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }

    #[test]
    fn empty_assets_url_is_rejected() {
        let config = ServiceConfig {
            assets_base_url: "  ".to_owned(),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
