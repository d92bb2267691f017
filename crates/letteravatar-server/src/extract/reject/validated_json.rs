//! JSON extractor running `validator` rules after deserialization.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, OptionalFromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// [`Json`] extractor that also validates the payload.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

impl<T, S> OptionalFromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error;

    /// Absent when the request has no body, rejected when the body is invalid.
    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        if !req.headers().contains_key(CONTENT_TYPE) {
            return Ok(None);
        }

        <Self as FromRequest<S>>::from_request(req, state)
            .await
            .map(Some)
    }
}

fn format_bounds(
    field: &str,
    params: &HashMap<Cow<'static, str>, serde_json::Value>,
    unit: &str,
) -> String {
    match (params.get("min"), params.get("max")) {
        (Some(min), Some(max)) => {
            format!("Field '{field}' must be between {min} and {max}{unit}")
        }
        (Some(min), None) => format!("Field '{field}' must be at least {min}{unit}"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max}{unit}"),
        _ => format!("Field '{field}' is out of valid range"),
    }
}

fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return format!("Field '{}': {}", field, custom_message);
    }

    match error.code.as_ref() {
        "length" => format_bounds(field, &error.params, " characters long"),
        "range" => format_bounds(field, &error.params, ""),
        "email" => format!("Field '{field}' must be a valid email address"),
        "url" => format!("Field '{field}' must be a valid URL"),
        code => format!("Field '{field}' failed validation: {code}"),
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let mut error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();
        error_messages.sort();

        let user_message = match error_messages.as_slice() {
            [] => "Validation failed".to_string(),
            [single_error] => single_error.clone(),
            multiple => multiple.join(". "),
        };

        tracing::debug!(
            target: "letteravatar_server::extract::validate",
            errors = ?errors.field_errors(),
            "Request validation failed"
        );

        ErrorKind::BadRequest
            .with_message(user_message)
            .with_resource("request")
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sized {
        #[validate(range(min = 1, max = 2048))]
        size: u32,
    }

    #[test]
    fn range_error_message() {
        let errors = Sized { size: 0 }.validate().unwrap_err();
        let error = Error::from(errors);

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        let message = error.message().unwrap();
        assert!(message.contains("'size'"));
        assert!(message.contains("between 1 and 2048"));
    }
}
