use letteravatar_core::render::RenderedAvatar;
use serde::{Deserialize, Serialize};

/// Rendered avatar markup handed back to the host page.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedAvatarResponse {
    /// The `<img>` fragment.
    pub markup: String,
    /// Remote URL the browser should verify before swapping it in.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remote_src: Option<String>,
    /// Anti-forgery token for the verification callback.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub verification_token: Option<String>,
}

impl RenderedAvatarResponse {
    /// Builds the response, attaching `token` only when verification is pending.
    pub fn new(rendered: RenderedAvatar, token: Option<String>) -> Self {
        let verification_token = rendered.pending_verification.as_ref().and(token);
        Self {
            markup: rendered.markup.into_string(),
            remote_src: rendered.pending_verification,
            verification_token,
        }
    }
}
