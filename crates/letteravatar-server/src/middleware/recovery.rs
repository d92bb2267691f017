//! Turns panics, timeouts and tower errors into JSON error responses.

use std::any::Any;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::{BoxError, ServiceBuilder};
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::ErrorKind;

const TRACING_TARGET: &str = "letteravatar_server::middleware::recovery";

/// Request timeout used when none is configured, in seconds.
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Limits applied by [`RouterRecoveryExt::with_recovery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RecoveryConfig {
    /// Seconds a request may run before it is answered with `503`.
    ///
    /// Synchronous remote checks count against it, so keep it above the
    /// probe timeout.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT)
    )]
    pub request_timeout: u64,
}

impl RecoveryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt<S> {
    /// Answers panics with `500` and slow requests with `503`.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        self.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(middleware_error))
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
    }
}

async fn middleware_error(error: BoxError) -> Response {
    if error.is::<Elapsed>() {
        tracing::warn!(target: TRACING_TARGET, "Request timed out");
        return ErrorKind::ServiceUnavailable
            .with_message("Request timed out")
            .into_response();
    }

    tracing::error!(target: TRACING_TARGET, error = %error, "Middleware failed");
    ErrorKind::InternalServerError
        .with_context(error.to_string())
        .into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    tracing::error!(target: TRACING_TARGET, panic = message, "Handler panicked");
    ErrorKind::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    async fn panicking() -> &'static str {
        panic!("handler exploded")
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "late"
    }

    #[tokio::test]
    async fn panic_becomes_internal_error() -> anyhow::Result<()> {
        let router = Router::new()
            .route("/panic", get(panicking))
            .with_recovery(&RecoveryConfig::default());
        let server = TestServer::new(router)?;

        let response = server.get("/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.text().contains("handler exploded"));
        Ok(())
    }

    #[tokio::test]
    async fn timeout_becomes_service_unavailable() -> anyhow::Result<()> {
        let config = RecoveryConfig { request_timeout: 1 };
        let router = Router::new().route("/slow", get(slow)).with_recovery(&config);
        let server = TestServer::new(router)?;

        let response = server.get("/slow").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        Ok(())
    }
}
