//! Avatar rendering handlers.
//!
//! Both entry points answer with the `<img>` markup. When the markup defers
//! the remote check to the browser and the caller named a session, the
//! response also carries the token for the verification callback.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use letteravatar_core::AvatarService;

use super::request::{RenderCommentAvatar, RenderCurrentUserAvatar};
use super::response::RenderedAvatarResponse;
use crate::extract::{Json, SessionId, ValidateJson};
use crate::handler::Result;
use crate::service::{ServiceState, VerificationGuard};

/// Tracing target for avatar rendering.
const TRACING_TARGET: &str = "letteravatar_server::handler::avatars";

/// Renders the avatar of a comment author or user.
#[tracing::instrument(skip_all, fields(has_session = session.is_some()))]
async fn render_comment_avatar(
    State(avatars): State<AvatarService>,
    State(verification): State<VerificationGuard>,
    session: Option<SessionId>,
    ValidateJson(request): ValidateJson<RenderCommentAvatar>,
) -> Result<Json<RenderedAvatarResponse>> {
    let size = request.size();
    let rendered = avatars
        .render_comment_avatar(&request.subject, &request.context, size, &request.alt)
        .await;

    tracing::debug!(
        target: TRACING_TARGET,
        size,
        deferred = rendered.pending_verification.is_some(),
        "Comment avatar rendered"
    );

    let token = session.map(|session| verification.issue(session.as_str()));
    Ok(Json(RenderedAvatarResponse::new(rendered, token)))
}

/// Renders the avatar of the logged-in user.
#[tracing::instrument(skip_all, fields(has_session = session.is_some()))]
async fn render_current_user_avatar(
    State(avatars): State<AvatarService>,
    State(verification): State<VerificationGuard>,
    session: Option<SessionId>,
    request: Option<ValidateJson<RenderCurrentUserAvatar>>,
) -> Result<Json<RenderedAvatarResponse>> {
    let ValidateJson(request) = request.unwrap_or_default();
    let size = request.size();
    let rendered = avatars
        .render_current_user_avatar(&request.context, size, &request.alt)
        .await;

    tracing::debug!(
        target: TRACING_TARGET,
        size,
        current_user = ?request.context.current_user,
        deferred = rendered.pending_verification.is_some(),
        "Current user avatar rendered"
    );

    let token = session.map(|session| verification.issue(session.as_str()));
    Ok(Json(RenderedAvatarResponse::new(rendered, token)))
}

/// Returns a [`Router`] with the avatar rendering routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/avatars/comment", post(render_comment_avatar))
        .route("/avatars/current-user", post(render_current_user_avatar))
}
