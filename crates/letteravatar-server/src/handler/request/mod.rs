//! Request types for HTTP handlers.

mod avatars;
mod verify;

pub use avatars::{RenderCommentAvatar, RenderCurrentUserAvatar};
pub use verify::VerifyRemoteAvatar;
