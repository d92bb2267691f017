//! Session identifier supplied by the host page.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;

use crate::handler::{Error, ErrorKind};

/// Header carrying the host's session identifier.
pub const SESSION_HEADER: &str = "x-session-id";

/// Longest session identifier accepted.
const MAX_SESSION_LENGTH: usize = 256;

/// Opaque session identifier the anti-forgery tokens are bound to.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct SessionId(String);

impl SessionId {
    /// Borrows the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or_else(|| ErrorKind::MissingSession.with_context("x-session-id header is absent"))?;

        let value = value
            .to_str()
            .map(str::trim)
            .map_err(|_| ErrorKind::BadRequest.with_message("Malformed session identifier"))?;

        if value.is_empty() || value.len() > MAX_SESSION_LENGTH {
            return Err(ErrorKind::BadRequest.with_message("Malformed session identifier"));
        }

        Ok(Self(value.to_owned()))
    }
}

impl<S> OptionalFromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(SESSION_HEADER) {
            return Ok(None);
        }

        <Self as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
