//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use letteravatar_core::mock::MockProbe;
//! use letteravatar_core::remote::RemoteAvatarChecker;
//! use letteravatar_server::handler::routes;
//! use letteravatar_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> letteravatar_server::Result<()> {
//! let checker = RemoteAvatarChecker::new(MockProbe::with_status(404));
//! let state = ServiceState::from_config(&ServiceConfig::default(), checker)?;
//! let router: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod avatars;
mod error;
mod monitors;
pub mod request;
pub mod response;
mod verify;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub(crate) use crate::handler::response::ErrorResponse;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and the not-found fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(avatars::routes())
        .merge(verify::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::Router;
    use axum_test::TestServer;
    use letteravatar_core::AvatarService;
    use letteravatar_core::assets::AssetLocator;
    use letteravatar_core::config::{MemorySettingsStore, StoredSettings};
    use letteravatar_core::identity::{Account, MemoryDirectory};
    use letteravatar_core::mock::MockProbe;
    use letteravatar_core::remote::RemoteAvatarChecker;

    use crate::handler::routes;
    use crate::service::{ServiceState, VerificationGuard};

    /// Secret used by every test server.
    pub const TEST_SECRET: &str = "test-verification-secret";

    /// Returns a [`ServiceState`] with one account (id 42, "Carmen").
    pub fn create_test_state(settings: StoredSettings, probe: Arc<MockProbe>) -> ServiceState {
        let directory = Arc::new(MemoryDirectory::new());
        directory
            .insert_account(Account {
                id: 42,
                display_name: "Carmen".to_owned(),
                email: "c@x.com".to_owned(),
            })
            .expect("directory accepts accounts");

        let avatars = AvatarService::builder(
            AssetLocator::new("https://blog.example.com/assets"),
            RemoteAvatarChecker::from_arc(probe),
        )
        .with_settings(Arc::new(MemorySettingsStore::with_settings(settings)))
        .with_memory_directory(directory)
        .build();

        let verification = VerificationGuard::new(TEST_SECRET).expect("valid secret");
        ServiceState::new(avatars, verification)
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub fn create_test_server_with_router(
        router: Router<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let server = TestServer::new(router.with_state(state))?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub fn create_test_server(probe: Arc<MockProbe>) -> anyhow::Result<TestServer> {
        let state = create_test_state(StoredSettings::default(), probe);
        create_test_server_with_router(routes(), state)
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server(Arc::new(MockProbe::failing()))?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server(Arc::new(MockProbe::failing()))?;
        let response = server.get("/nope").await;
        response.assert_status_not_found();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "not_found");
        Ok(())
    }
}
