//! Render entry points tying resolution, configuration and selection together.

use std::fmt;
use std::sync::Arc;

use crate::assets::AssetLocator;
use crate::config::{AvatarConfiguration, MemorySettingsStore, SettingsStore, load_configuration};
use crate::identity::{
    ContentMetadata, ContextHints, IdentityResolver, MemoryDirectory, ResolvedIdentity,
    SubjectReference, UserDirectory,
};
use crate::remote::RemoteAvatarChecker;
use crate::render::{AvatarRenderer, RenderedAvatar};

/// Avatar rendering service shared by the host integration.
///
/// Configuration is read from the settings store on every call, so changes
/// made by the host's settings surface apply to the next render.
#[derive(Clone)]
pub struct AvatarService {
    settings: Arc<dyn SettingsStore>,
    directory: Arc<dyn UserDirectory>,
    metadata: Arc<dyn ContentMetadata>,
    assets: AssetLocator,
    checker: RemoteAvatarChecker,
}

impl AvatarService {
    /// Starts a builder with in-memory settings and an empty directory.
    pub fn builder(assets: AssetLocator, checker: RemoteAvatarChecker) -> AvatarServiceBuilder {
        let directory = Arc::new(MemoryDirectory::new());
        AvatarServiceBuilder {
            settings: Arc::new(MemorySettingsStore::new()),
            directory: directory.clone(),
            metadata: directory,
            assets,
            checker,
        }
    }

    /// Loads the configuration snapshot for the current request.
    pub fn configuration(&self) -> AvatarConfiguration {
        load_configuration(self.settings.as_ref())
    }

    /// Resolves a subject reference into a name and email.
    pub fn resolve(&self, subject: &SubjectReference, hints: &ContextHints) -> ResolvedIdentity {
        IdentityResolver::new(self.directory.as_ref(), self.metadata.as_ref())
            .resolve(subject, hints)
    }

    /// Renders the avatar for a comment, user or free-form reference.
    pub async fn render_comment_avatar(
        &self,
        subject: &SubjectReference,
        hints: &ContextHints,
        size: u32,
        alt: &str,
    ) -> RenderedAvatar {
        let identity = self.resolve(subject, hints);
        self.render_identity(&identity, size, alt).await
    }

    /// Renders the avatar of the logged-in user named by `hints`.
    pub async fn render_current_user_avatar(
        &self,
        hints: &ContextHints,
        size: u32,
        alt: &str,
    ) -> RenderedAvatar {
        self.render_comment_avatar(&SubjectReference::CurrentUser, hints, size, alt)
            .await
    }

    /// Renders the avatar for an already resolved identity.
    pub async fn render_identity(
        &self,
        identity: &ResolvedIdentity,
        size: u32,
        alt: &str,
    ) -> RenderedAvatar {
        let config = self.configuration();
        AvatarRenderer::new(&config, &self.assets, &self.checker)
            .render(identity, size, alt)
            .await
    }

    /// Checks whether a remote avatar URL points at a custom image.
    pub async fn verify_remote_url(&self, url: &str) -> bool {
        self.checker.exists_for_url(url).await
    }

    /// Asset locator used for letter images.
    pub fn assets(&self) -> &AssetLocator {
        &self.assets
    }
}

impl fmt::Debug for AvatarService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarService")
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AvatarService`].
pub struct AvatarServiceBuilder {
    settings: Arc<dyn SettingsStore>,
    directory: Arc<dyn UserDirectory>,
    metadata: Arc<dyn ContentMetadata>,
    assets: AssetLocator,
    checker: RemoteAvatarChecker,
}

impl AvatarServiceBuilder {
    /// Sets the settings store.
    pub fn with_settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the account directory.
    pub fn with_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = directory;
        self
    }

    /// Sets the anonymous-author metadata source.
    pub fn with_metadata(mut self, metadata: Arc<dyn ContentMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Uses one in-memory directory for accounts and metadata.
    pub fn with_memory_directory(self, directory: Arc<MemoryDirectory>) -> Self {
        self.with_directory(directory.clone()).with_metadata(directory)
    }

    /// Builds the service.
    pub fn build(self) -> AvatarService {
        AvatarService {
            settings: self.settings,
            directory: self.directory,
            metadata: self.metadata,
            assets: self.assets,
            checker: self.checker,
        }
    }
}

impl fmt::Debug for AvatarServiceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarServiceBuilder")
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}
