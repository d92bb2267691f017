//! `HEAD` probe against the remote avatar service.

use std::sync::Arc;
use std::time::Instant;

use letteravatar_core::remote::{AvatarProbe, RemoteAvatarChecker};
use reqwest::Client;

use crate::config::ReqwestProbeConfig;
use crate::error::{Error, Result};

/// Tracing target for probe operations.
pub const TRACING_TARGET: &str = "letteravatar_reqwest::client";

struct ReqwestProbeInner {
    http: Client,
    config: ReqwestProbeConfig,
}

/// Reqwest-based [`AvatarProbe`].
///
/// Redirects are not followed, so the status reported is the one the
/// remote service answered with.
#[derive(Clone)]
pub struct ReqwestProbe {
    inner: Arc<ReqwestProbeInner>,
}

impl std::fmt::Debug for ReqwestProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestProbe")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestProbe {
    /// Creates a new probe with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ReqwestProbeConfig) -> Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis() as u64,
            "Creating remote avatar probe"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let inner = ReqwestProbeInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the probe configuration.
    pub fn config(&self) -> &ReqwestProbeConfig {
        &self.inner.config
    }

    /// Wraps this probe into the fail-safe checker used by rendering.
    pub fn into_checker(self) -> RemoteAvatarChecker {
        RemoteAvatarChecker::new(self)
    }
}

#[async_trait::async_trait]
impl AvatarProbe for ReqwestProbe {
    async fn head(&self, url: &str) -> letteravatar_core::Result<u16> {
        let started_at = Instant::now();

        let response = self
            .inner
            .http
            .head(url)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status().as_u16();
        tracing::trace!(
            target: TRACING_TARGET,
            status,
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Remote avatar probe answered"
        );

        Ok(status)
    }
}
