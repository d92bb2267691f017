//! CORS and request timeout settings.
//!
//! ```bash
//! letteravatar --cors-origins "https://blog.example.com" --request-timeout 60
//! ```

use clap::Args;
use letteravatar_server::middleware::{CorsConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use super::server::check_timeout;
use crate::TRACING_TARGET_CONFIG;

/// Settings for the router's middleware layers.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Origins of the pages that embed avatars and call the verification route.
    #[clap(flatten)]
    pub cors: CorsConfig,

    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        check_timeout("request", self.recovery.request_timeout)
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            request_timeout_secs = self.recovery.request_timeout,
            "Middleware configuration"
        );
    }
}
