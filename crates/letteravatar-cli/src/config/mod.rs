//! Command-line and environment configuration.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Listener, TLS, drain timeout
//! ├── middleware: MiddlewareConfig  # CORS, request timeout
//! ├── service: ServiceConfig        # Settings file, directory, assets, secret
//! └── probe: ReqwestProbeConfig     # Remote avatar check timeout
//! ```
//!
//! Every flag also reads an environment variable; see `--help`.

mod middleware;
mod server;

use anyhow::Context;
use clap::Parser;
use letteravatar_reqwest::ReqwestProbeConfig;
use letteravatar_server::service::ServiceConfig;
pub use middleware::MiddlewareConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TRACING_TARGET_CONFIG;

/// Letter avatar server.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "letteravatar", version, about = "Letter avatar server")]
pub struct Cli {
    #[clap(flatten)]
    pub server: ServerConfig,

    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    #[clap(flatten)]
    pub service: ServiceConfig,

    #[clap(flatten)]
    pub probe: ReqwestProbeConfig,

    /// Emit logs as JSON lines.
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    #[serde(default)]
    pub log_json: bool,
}

impl Cli {
    /// Parses arguments after loading `.env`, so its values act as env defaults.
    pub fn init() -> Self {
        #[cfg(feature = "dotenv")]
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("letteravatar: ignoring unreadable .env file: {err}");
        }

        Self::parse()
    }

    /// Installs the global subscriber, filtered by `RUST_LOG` (default `info`).
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        if self.log_json {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.server.validate().context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs the effective configuration. The verification secret is omitted.
    pub fn log(&self) {
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            settings_path = ?self.service.settings_path,
            directory_path = ?self.service.directory_path,
            assets_base_url = %self.service.assets_base_url,
            development_secret = self.service.uses_development_secret(),
            "Service configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            timeout_secs = self.probe.effective_timeout().as_secs(),
            user_agent = %self.probe.effective_user_agent(),
            "Remote probe configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["letteravatar"]).unwrap();
        assert_eq!(cli.server.port, 3000);
        assert_eq!(cli.service.assets_base_url, "/assets/images");
        assert_eq!(cli.probe.http_timeout, 5);
        assert_eq!(cli.middleware.recovery.request_timeout, 30);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from([
            "letteravatar",
            "--port",
            "8080",
            "--assets-base-url",
            "https://cdn.example.com/avatars",
            "--verification-secret",
            "a-much-longer-production-secret",
            "--probe-timeout",
            "2",
            "--cors-origins",
            "https://a.example.com,https://b.example.com",
        ])
        .unwrap();

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.service.assets_base_url, "https://cdn.example.com/avatars");
        assert!(!cli.service.uses_development_secret());
        assert_eq!(cli.probe.http_timeout, 2);
        assert_eq!(cli.middleware.cors.allowed_origins.len(), 2);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn short_secret_fails_validation() {
        let cli = Cli::try_parse_from(["letteravatar", "--verification-secret", "short"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
