use letteravatar_core::identity::{ContextHints, SubjectReference};
use letteravatar_core::render::DEFAULT_SIZE;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Largest avatar size accepted over HTTP.
const MAX_SIZE: u32 = 2048;

/// Request payload for rendering a comment or user avatar.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenderCommentAvatar {
    /// What the avatar is for.
    pub subject: SubjectReference,
    /// Post and logged-in user context.
    #[serde(default)]
    pub context: ContextHints,
    /// Requested pixel size, 96 when omitted.
    #[validate(range(min = 1, max = 2048))]
    pub size: Option<u32>,
    /// Alternative text of the image.
    #[validate(length(max = 512))]
    #[serde(default)]
    pub alt: String,
}

impl RenderCommentAvatar {
    /// Requested size, or the default.
    pub fn size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_SIZE).min(MAX_SIZE)
    }
}

/// Request payload for rendering the logged-in user's avatar.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RenderCurrentUserAvatar {
    /// Post and logged-in user context.
    #[serde(default)]
    pub context: ContextHints,
    /// Requested pixel size, 96 when omitted.
    #[validate(range(min = 1, max = 2048))]
    pub size: Option<u32>,
    /// Alternative text of the image.
    #[validate(length(max = 512))]
    #[serde(default)]
    pub alt: String,
}

impl RenderCurrentUserAvatar {
    /// Requested size, or the default.
    pub fn size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_SIZE).min(MAX_SIZE)
    }
}
