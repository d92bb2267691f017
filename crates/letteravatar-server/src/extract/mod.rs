//! Request extractors with structured rejections.
//!
//! - [`Json`] and [`ValidateJson`] for render requests
//! - [`Form`] for the browser verification callback
//! - [`SessionId`] for the per-session anti-forgery token

pub mod reject;
mod session;

pub use crate::extract::reject::{Form, Json, ValidateJson};
pub use crate::extract::session::{SESSION_HEADER, SessionId};
