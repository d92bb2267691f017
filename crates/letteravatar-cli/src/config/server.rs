//! Listener settings.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
#[cfg(feature = "tls")]
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::ensure;
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Longest drain or request timeout accepted, in seconds.
pub(crate) const MAX_TIMEOUT_SECS: u64 = 300;

/// Where the avatar server listens and how long it drains on stop.
///
/// ```bash
/// letteravatar --host 0.0.0.0 --port 8080
/// HOST=0.0.0.0 PORT=8080 letteravatar
/// ```
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on, 1024 or above.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds open connections get to finish after a stop signal.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,

    /// PEM certificate chain. HTTPS is served when the key is set too.
    #[cfg(feature = "tls")]
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<PathBuf>,

    /// PEM private key for `--tls-cert-path`.
    #[cfg(feature = "tls")]
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Rejects settings the listener cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.port >= 1024,
            "port {} needs elevated privileges, pick 1024 or above",
            self.port
        );
        check_timeout("shutdown", self.shutdown_timeout)?;

        #[cfg(feature = "tls")]
        ensure!(
            self.tls_cert_path.is_some() == self.tls_key_path.is_some(),
            "--tls-cert-path and --tls-key-path go together"
        );

        Ok(())
    }

    /// Socket address to bind.
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Drain budget after a stop signal.
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// True when listening on the unspecified address.
    pub fn is_public(&self) -> bool {
        self.host.is_unspecified()
    }

    /// Certificate and key paths, when both are set.
    #[cfg(feature = "tls")]
    pub fn tls_paths(&self) -> Option<(&Path, &Path)> {
        self.tls_cert_path
            .as_deref()
            .zip(self.tls_key_path.as_deref())
    }

    pub fn is_tls_enabled(&self) -> bool {
        #[cfg(feature = "tls")]
        return self.tls_paths().is_some();

        #[cfg(not(feature = "tls"))]
        false
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            addr = %self.server_addr(),
            shutdown_timeout_secs = self.shutdown_timeout,
            tls = self.is_tls_enabled(),
            "Listener configuration"
        );
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            shutdown_timeout: 30,
            #[cfg(feature = "tls")]
            tls_cert_path: None,
            #[cfg(feature = "tls")]
            tls_key_path: None,
        }
    }
}

/// Checks that a timeout lies within `1..=MAX_TIMEOUT_SECS` seconds.
pub(crate) fn check_timeout(name: &str, secs: u64) -> anyhow::Result<()> {
    ensure!(
        (1..=MAX_TIMEOUT_SECS).contains(&secs),
        "{name} timeout must be 1-{MAX_TIMEOUT_SECS} seconds, got {secs}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_loopback() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_public());
        assert!(!config.is_tls_enabled());
        assert_eq!(config.server_addr(), SocketAddr::from(([127, 0, 0, 1], 3000)));
    }

    #[test]
    fn privileged_port_is_rejected() {
        let config = ServerConfig {
            port: 443,
            ..ServerConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("port 443"));
    }

    #[test]
    fn shutdown_timeout_bounds() {
        for (secs, valid) in [(0, false), (1, true), (300, true), (301, false)] {
            let config = ServerConfig {
                shutdown_timeout: secs,
                ..ServerConfig::default()
            };
            assert_eq!(config.validate().is_ok(), valid, "{secs}s");
        }
    }

    #[test]
    fn unspecified_host_is_public() {
        let config = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ..ServerConfig::default()
        };
        assert!(config.is_public());
    }

    #[cfg(feature = "tls")]
    #[test]
    fn tls_paths_need_each_other() {
        let config = ServerConfig {
            tls_cert_path: Some(PathBuf::from("cert.pem")),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(config.tls_paths().is_none());
    }
}
