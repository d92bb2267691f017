//! Handler errors and their JSON rendering.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// Error returned by handlers and extractors.
///
/// Renders as the [`ErrorResponse`] template of its [`ErrorKind`], with the
/// optional message, context and resource merged in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "errors do nothing unless returned"]
pub struct Error {
    kind: ErrorKind,
    message: Option<Cow<'static, str>>,
    context: Option<Cow<'static, str>>,
    resource: Option<&'static str>,
}

impl Error {
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
            resource: None,
        }
    }

    /// Client-facing message appended to the kind's default one.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Detail about what exactly went wrong.
    pub fn with_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Name of the resource the request targeted.
    pub fn with_resource(mut self, resource: &'static str) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.kind.status_code().as_u16())?;
        let details = [self.message.as_deref(), self.context.as_deref(), self.resource];
        for detail in details.into_iter().flatten() {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let mut response = self.kind.response();
        if let Some(message) = self.message {
            response = response.with_message(message);
        }
        if let Some(context) = self.context {
            response = response.with_context(context);
        }
        if let Some(resource) = self.resource {
            response = response.with_resource(resource);
        }
        response.into_response()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result of a handler or extractor.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure classes the handlers report, one per response template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or invalid request data.
    BadRequest,
    /// No session header on a route that needs one.
    MissingSession,
    /// Anti-forgery token does not match the session.
    Forbidden,
    /// No route matched.
    NotFound,
    /// Body over the size limit.
    PayloadTooLarge,
    /// Panic or unexpected middleware failure.
    InternalServerError,
    /// Request ran past its timeout.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Shorthand for `Error::new(kind).with_message(message)`.
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_message(message)
    }

    /// Shorthand for `Error::new(kind).with_context(context)`.
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_context(context)
    }

    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Response template rendered for this kind.
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::MissingSession => ErrorResponse::MISSING_SESSION,
            Self::Forbidden => ErrorResponse::FORBIDDEN,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::PayloadTooLarge => ErrorResponse::PAYLOAD_TOO_LARGE,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => ErrorResponse::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response().name)
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn display_lists_details_in_order() {
        let error = ErrorKind::Forbidden
            .with_message("Invalid verification token")
            .with_resource("verification");

        assert_eq!(
            error.to_string(),
            "forbidden (403): Invalid verification token: verification"
        );
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    }

    #[test]
    fn kinds_map_to_statuses() {
        let cases = [
            (ErrorKind::BadRequest, StatusCode::BAD_REQUEST),
            (ErrorKind::MissingSession, StatusCode::UNAUTHORIZED),
            (ErrorKind::Forbidden, StatusCode::FORBIDDEN),
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (ErrorKind::InternalServerError, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorKind::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (kind, status) in cases {
            assert_eq!(kind.status_code(), status, "{kind}");
        }
    }

    #[tokio::test]
    async fn response_body_merges_details() -> anyhow::Result<()> {
        let response = ErrorKind::BadRequest
            .with_context("size must be between 1 and 512")
            .with_resource("request")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(body["name"], "bad_request");
        assert_eq!(body["resource"], "request");
        assert_eq!(body["context"], "size must be between 1 and 512");
        Ok(())
    }
}
