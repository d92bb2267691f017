//! Response types for HTTP handlers.

mod avatars;
mod error_response;
mod monitors;

pub use avatars::RenderedAvatarResponse;
pub use error_response::ErrorResponse;
pub use monitors::HealthResponse;
