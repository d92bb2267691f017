use serde::{Deserialize, Serialize};
use validator::Validate;

/// Form submitted by the browser to verify a remote avatar.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyRemoteAvatar {
    /// The `data-remote-src` URL of the rendered avatar.
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    /// Anti-forgery token issued with the rendered avatar.
    #[validate(length(min = 1, max = 128))]
    pub token: String,
}
