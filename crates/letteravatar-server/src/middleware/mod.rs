//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Recovery: panics, timeouts and tower service errors
//! - Observability: request ids, trace spans, sensitive header redaction
//! - Security: CORS, response headers and body limits
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use letteravatar_server::middleware::{
//!     CorsConfig, RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&CorsConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod security;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt};
