use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::RemoteAvatarUrl;
use crate::{Result, TRACING_TARGET_REMOTE};

/// Issues header-only requests against the remote avatar service.
#[async_trait]
pub trait AvatarProbe: Send + Sync {
    /// Sends a `HEAD` request to `url` and returns the response status.
    ///
    /// Transport failures (connection refused, timeout) are errors.
    async fn head(&self, url: &str) -> Result<u16>;
}

/// Fail-safe existence check over an [`AvatarProbe`].
///
/// Every failure is reported as "no remote avatar".
#[derive(Clone)]
pub struct RemoteAvatarChecker {
    inner: Arc<dyn AvatarProbe>,
}

impl RemoteAvatarChecker {
    /// Wraps a probe.
    pub fn new<P>(probe: P) -> Self
    where
        P: AvatarProbe + 'static,
    {
        Self {
            inner: Arc::new(probe),
        }
    }

    /// Wraps an already shared probe.
    pub fn from_arc(probe: Arc<dyn AvatarProbe>) -> Self {
        Self { inner: probe }
    }

    /// Whether `email` has a custom image on the remote service.
    pub async fn exists_for_email(&self, email: &str) -> bool {
        let lookup = RemoteAvatarUrl::from_email(email).lookup_url();
        self.exists(&lookup).await
    }

    /// Whether the image behind an existing remote URL is a custom one.
    ///
    /// URLs that do not point at the remote service are rejected without
    /// issuing a request.
    pub async fn exists_for_url(&self, raw: &str) -> bool {
        match RemoteAvatarUrl::parse(raw) {
            Ok(url) => self.exists(&url.lookup_url()).await,
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET_REMOTE,
                    error = %error,
                    "Rejected remote avatar URL"
                );
                false
            }
        }
    }

    async fn exists(&self, lookup_url: &str) -> bool {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET_REMOTE,
            url = %lookup_url,
            "Checking remote avatar"
        );

        match self.inner.head(lookup_url).await {
            Ok(status) => {
                let exists = status == 200;
                tracing::debug!(
                    target: TRACING_TARGET_REMOTE,
                    status,
                    exists,
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    "Remote avatar check completed"
                );
                exists
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_REMOTE,
                    error = %error,
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    "Remote avatar check failed"
                );
                false
            }
        }
    }
}

impl fmt::Debug for RemoteAvatarChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteAvatarChecker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProbe;
    use crate::remote::email_hash;

    const ABSENT_URL: &str =
        "https://secure.gravatar.com/avatar/00000000000000000000000000000000?s=96&r=g";

    #[tokio::test]
    async fn status_200_means_exists() {
        let probe = Arc::new(MockProbe::with_status(200));
        let checker = RemoteAvatarChecker::from_arc(probe.clone());

        assert!(checker.exists_for_url(ABSENT_URL).await);
        assert_eq!(probe.calls(), 1);
        assert_eq!(
            probe.last_url().as_deref(),
            Some("https://secure.gravatar.com/avatar/00000000000000000000000000000000?d=404")
        );
    }

    #[tokio::test]
    async fn other_statuses_mean_absent() {
        for status in [404, 302, 500] {
            let checker = RemoteAvatarChecker::new(MockProbe::with_status(status));
            assert!(!checker.exists_for_url(ABSENT_URL).await, "status {status}");
        }
    }

    #[tokio::test]
    async fn transport_failure_means_absent() {
        let checker = RemoteAvatarChecker::new(MockProbe::failing());
        assert!(!checker.exists_for_email("c@x.com").await);
    }

    #[tokio::test]
    async fn foreign_url_is_not_requested() {
        let probe = Arc::new(MockProbe::with_status(200));
        let checker = RemoteAvatarChecker::from_arc(probe.clone());

        assert!(!checker.exists_for_url("https://example.com/avatar.png").await);
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn url_with_port_is_not_requested() {
        let probe = Arc::new(MockProbe::with_status(200));
        let checker = RemoteAvatarChecker::from_arc(probe.clone());

        let raw = "http://secure.gravatar.com:25/avatar/d41d8cd98f00b204e9800998ecf8427e?s=1";
        assert!(!checker.exists_for_url(raw).await);
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn plain_http_url_is_looked_up_over_https() {
        let probe = Arc::new(MockProbe::with_status(200));
        let checker = RemoteAvatarChecker::from_arc(probe.clone());

        let raw = "http://en.gravatar.com/avatar/d41d8cd98f00b204e9800998ecf8427e?s=1";
        assert!(checker.exists_for_url(raw).await);
        assert_eq!(
            probe.last_url().as_deref(),
            Some("https://secure.gravatar.com/avatar/d41d8cd98f00b204e9800998ecf8427e?d=404")
        );
    }

    #[tokio::test]
    async fn email_lookup_uses_hash() {
        let probe = Arc::new(MockProbe::with_status(200));
        let checker = RemoteAvatarChecker::from_arc(probe.clone());

        assert!(checker.exists_for_email(" C@X.com").await);
        let expected = format!(
            "https://secure.gravatar.com/avatar/{}?d=404",
            email_hash("c@x.com")
        );
        assert_eq!(probe.last_url(), Some(expected));
    }
}
