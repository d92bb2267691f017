//! URL-encoded form extractor with structured rejections.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form as AxumForm, FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::enhanced_json::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Form extractor for `application/x-www-form-urlencoded` bodies.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Form<T>(pub T);

impl<T, S> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumForm::<T>::from_request(req, state).await {
            Ok(AxumForm(form)) => Ok(Form(form)),
            Err(rejection) => Err(enhance_form_error(rejection)),
        }
    }
}

fn enhance_form_error(rejection: FormRejection) -> Error {
    tracing::debug!(
        target: "letteravatar_server::extract::form",
        error = %rejection,
        "Form data parsing failed"
    );

    match rejection {
        FormRejection::FailedToDeserializeForm(err) => {
            let error_message = err.body_text();

            match extract_field_name_from_error(&error_message) {
                Some(field) if error_message.contains("missing field") => ErrorKind::BadRequest
                    .with_message("Missing required form field")
                    .with_context(format!("The form field '{field}' is required")),
                _ => ErrorKind::BadRequest
                    .with_message("Invalid form data")
                    .with_context(sanitize_error_message(&error_message)),
            }
        }
        FormRejection::InvalidFormContentType(_) => ErrorKind::BadRequest
            .with_message("Invalid content type for form data")
            .with_context("Expected 'application/x-www-form-urlencoded' content type"),
        other => ErrorKind::BadRequest
            .with_message("Invalid form submission")
            .with_context(sanitize_error_message(&other.body_text())),
    }
}

/// Pulls the field name out of a serde "missing field `x`" message.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    let start = error_message.find('`')?;
    let rest = &error_message[start + 1..];
    let end = rest.find('`')?;
    Some(&rest[..end])
}
