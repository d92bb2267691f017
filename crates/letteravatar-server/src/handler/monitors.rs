//! Liveness check handler.

use axum::Router;
use axum::routing::get;

use super::response::HealthResponse;
use crate::extract::Json;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "letteravatar_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status() -> Json<HealthResponse> {
    tracing::debug!(target: TRACING_TARGET, "Health status check requested");
    Json(HealthResponse::healthy())
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use letteravatar_core::config::StoredSettings;
    use letteravatar_core::mock::MockProbe;

    use super::*;
    use crate::handler::test::{create_test_server_with_router, create_test_state};

    #[tokio::test]
    async fn test_health_endpoint_response_format() -> anyhow::Result<()> {
        let state = create_test_state(StoredSettings::default(), Arc::new(MockProbe::failing()));
        let server = create_test_server_with_router(routes(), state)?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let status_response = response.json::<HealthResponse>();
        assert_eq!(status_response.status, "healthy");

        let age = jiff::Timestamp::now().duration_since(status_response.checked_at);
        assert!(age.as_secs() < 60, "Response timestamp should be recent");

        Ok(())
    }
}
