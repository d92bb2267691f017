//! Drop-in replacements for the `axum` body extractors.
//!
//! Rejections are converted into the handler [`Error`] so every failure
//! answers with the same JSON error body.
//!
//! [`Error`]: crate::handler::Error

pub mod enhanced_form;
pub mod enhanced_json;
pub mod validated_json;

pub use self::enhanced_form::Form;
pub use self::enhanced_json::Json;
pub use self::validated_json::ValidateJson;
