//! Commonly used types, re-exported for glob import.

pub use crate::assets::AssetLocator;
pub use crate::config::{AvatarConfiguration, SettingsStore, StoredSettings};
pub use crate::identity::{
    Account, AnonymousAuthor, ContentMetadata, ContextHints, ResolvedIdentity, SubjectReference,
    UserDirectory,
};
pub use crate::markup::Markup;
pub use crate::remote::{AvatarProbe, RemoteAvatarChecker};
pub use crate::render::RenderedAvatar;
pub use crate::service::{AvatarService, AvatarServiceBuilder};
pub use crate::{Error, ErrorKind, Result};
