//! Browser callback confirming a remote avatar exists.
//!
//! Rendered markup with a `data-remote-src` attribute leaves the existence
//! check to the browser, which posts the URL back here together with the
//! token issued for its session.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use letteravatar_core::AvatarService;
use validator::Validate;

use super::request::VerifyRemoteAvatar;
use crate::extract::{Form, SessionId};
use crate::handler::{ErrorKind, Result};
use crate::service::{ServiceState, VerificationGuard};

/// Tracing target for verification callbacks.
const TRACING_TARGET: &str = "letteravatar_server::handler::verify";

/// Answers `1` when the remote avatar exists and `0` otherwise.
#[tracing::instrument(skip_all)]
async fn verify_remote_avatar(
    State(avatars): State<AvatarService>,
    State(verification): State<VerificationGuard>,
    session: SessionId,
    Form(form): Form<VerifyRemoteAvatar>,
) -> Result<&'static str> {
    form.validate()?;

    if !verification.verify(session.as_str(), &form.token) {
        tracing::warn!(
            target: TRACING_TARGET,
            "Verification token does not match the session"
        );

        return Err(ErrorKind::Forbidden
            .with_message("Invalid verification token")
            .with_resource("verification"));
    }

    let exists = avatars.verify_remote_url(&form.url).await;
    tracing::debug!(target: TRACING_TARGET, exists, "Remote avatar verified");

    Ok(if exists { "1" } else { "0" })
}

/// Returns a [`Router`] with the verification route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/avatars/verify", post(verify_remote_avatar))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{HeaderName, HeaderValue};
    use letteravatar_core::config::StoredSettings;
    use letteravatar_core::mock::MockProbe;

    use super::*;
    use crate::handler::test::{TEST_SECRET, create_test_server_with_router, create_test_state};

    const REMOTE_URL: &str =
        "https://secure.gravatar.com/avatar/d41d8cd98f00b204e9800998ecf8427e?s=96&r=g";

    fn session(value: &'static str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-session-id"),
            HeaderValue::from_static(value),
        )
    }

    fn token(session: &str) -> String {
        VerificationGuard::new(TEST_SECRET).unwrap().issue(session)
    }

    fn form(url: &str, token: String) -> VerifyRemoteAvatar {
        VerifyRemoteAvatar {
            url: url.to_owned(),
            token,
        }
    }

    #[tokio::test]
    async fn existing_avatar_answers_one() -> anyhow::Result<()> {
        let probe = Arc::new(MockProbe::with_status(200));
        let state = create_test_state(StoredSettings::default(), probe.clone());
        let server = create_test_server_with_router(routes(), state)?;

        let (name, value) = session("session-1");
        let response = server
            .post("/avatars/verify")
            .add_header(name, value)
            .form(&form(REMOTE_URL, token("session-1")))
            .await;

        response.assert_status_ok();
        response.assert_text("1");
        assert_eq!(probe.calls(), 1);
        assert_eq!(
            probe.last_url().as_deref(),
            Some("https://secure.gravatar.com/avatar/d41d8cd98f00b204e9800998ecf8427e?d=404")
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_avatar_answers_zero() -> anyhow::Result<()> {
        let probe = Arc::new(MockProbe::with_status(404));
        let state = create_test_state(StoredSettings::default(), probe);
        let server = create_test_server_with_router(routes(), state)?;

        let (name, value) = session("session-1");
        let response = server
            .post("/avatars/verify")
            .add_header(name, value)
            .form(&form(REMOTE_URL, token("session-1")))
            .await;

        response.assert_status_ok();
        response.assert_text("0");
        Ok(())
    }

    #[tokio::test]
    async fn foreign_url_answers_zero_without_request() -> anyhow::Result<()> {
        let probe = Arc::new(MockProbe::with_status(200));
        let state = create_test_state(StoredSettings::default(), probe.clone());
        let server = create_test_server_with_router(routes(), state)?;

        let (name, value) = session("session-1");
        let response = server
            .post("/avatars/verify")
            .add_header(name, value)
            .form(&form("https://example.com/avatar.png", token("session-1")))
            .await;

        response.assert_status_ok();
        response.assert_text("0");
        assert_eq!(probe.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn token_of_other_session_is_forbidden() -> anyhow::Result<()> {
        let probe = Arc::new(MockProbe::with_status(200));
        let state = create_test_state(StoredSettings::default(), probe.clone());
        let server = create_test_server_with_router(routes(), state)?;

        let (name, value) = session("session-2");
        let response = server
            .post("/avatars/verify")
            .add_header(name, value)
            .form(&form(REMOTE_URL, token("session-1")))
            .await;

        response.assert_status_forbidden();
        assert_eq!(probe.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_session_is_unauthorized() -> anyhow::Result<()> {
        let state = create_test_state(StoredSettings::default(), Arc::new(MockProbe::failing()));
        let server = create_test_server_with_router(routes(), state)?;

        let response = server
            .post("/avatars/verify")
            .form(&form(REMOTE_URL, token("session-1")))
            .await;

        response.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn missing_token_field_is_bad_request() -> anyhow::Result<()> {
        let state = create_test_state(StoredSettings::default(), Arc::new(MockProbe::failing()));
        let server = create_test_server_with_router(routes(), state)?;

        let (name, value) = session("session-1");
        let response = server
            .post("/avatars/verify")
            .add_header(name, value)
            .text("url=https%3A%2F%2Fsecure.gravatar.com%2Favatar%2Fabc")
            .content_type("application/x-www-form-urlencoded")
            .await;

        response.assert_status_bad_request();
        Ok(())
    }
}
