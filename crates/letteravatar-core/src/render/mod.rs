//! Avatar selection: decide what to show, then render it.

use std::time::Instant;

use crate::TRACING_TARGET_RENDER;
use crate::assets::AssetLocator;
use crate::config::AvatarConfiguration;
use crate::identity::{ResolvedIdentity, is_email};
use crate::markup::{ImageTag, Markup};
use crate::remote::{DefaultMode, RemoteAvatarChecker, RemoteAvatarUrl};

/// Size used when the host asks for a zero-sized avatar.
pub const DEFAULT_SIZE: u32 = 96;

/// What an avatar render will produce, decided without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarPlan {
    /// Local letter image only.
    Local { src: String },
    /// Local letter image, remote URL attached for a browser-side check.
    Deferred { src: String, remote_src: String },
    /// Probe the remote service now and pick one of the two sources.
    Verify {
        email: String,
        remote_src: String,
        fallback_src: String,
    },
    /// Remote URL that falls back to the letter image on the service side.
    Delegated { src: String },
}

impl AvatarPlan {
    /// Plans the avatar for `identity` at `size`.
    pub fn new(
        identity: &ResolvedIdentity,
        size: u32,
        config: &AvatarConfiguration,
        assets: &AssetLocator,
    ) -> Self {
        let local = assets.letter_image(&identity.display_name, size, config);
        let email = identity.email.as_str();
        // Malformed emails count as absent.
        if !config.use_remote_service || !is_email(email) {
            return Self::Local { src: local };
        }

        if config.use_client_side_verification {
            Self::Deferred {
                src: local,
                remote_src: RemoteAvatarUrl::for_email(email, size).to_string(),
            }
        } else if config.remote_default_fallback {
            let default = DefaultMode::Image(local);
            Self::Delegated {
                src: RemoteAvatarUrl::for_email_with_default(email, size, &default).to_string(),
            }
        } else {
            Self::Verify {
                email: email.to_owned(),
                remote_src: RemoteAvatarUrl::for_email(email, size).to_string(),
                fallback_src: local,
            }
        }
    }

    /// True when rendering this plan issues a network request.
    pub fn needs_probe(&self) -> bool {
        matches!(self, Self::Verify { .. })
    }
}

/// Result of a render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAvatar {
    pub markup: Markup,
    /// Remote URL left for the browser to verify, if any.
    pub pending_verification: Option<String>,
}

/// Executes [`AvatarPlan`]s against one configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AvatarRenderer<'a> {
    config: &'a AvatarConfiguration,
    assets: &'a AssetLocator,
    checker: &'a RemoteAvatarChecker,
}

impl<'a> AvatarRenderer<'a> {
    /// Creates a renderer.
    pub fn new(
        config: &'a AvatarConfiguration,
        assets: &'a AssetLocator,
        checker: &'a RemoteAvatarChecker,
    ) -> Self {
        Self {
            config,
            assets,
            checker,
        }
    }

    /// Renders the avatar markup. Never fails.
    pub async fn render(&self, identity: &ResolvedIdentity, size: u32, alt: &str) -> RenderedAvatar {
        let size = if size == 0 { DEFAULT_SIZE } else { size };
        let plan = AvatarPlan::new(identity, size, self.config, self.assets);
        let started_at = Instant::now();

        let (src, remote_src) = match &plan {
            AvatarPlan::Local { src } | AvatarPlan::Delegated { src } => (src.as_str(), None),
            AvatarPlan::Deferred { src, remote_src } => (src.as_str(), Some(remote_src.as_str())),
            AvatarPlan::Verify {
                email,
                remote_src,
                fallback_src,
            } => {
                if self.checker.exists_for_email(email).await {
                    (remote_src.as_str(), None)
                } else {
                    (fallback_src.as_str(), None)
                }
            }
        };

        let markup = ImageTag {
            alt,
            src,
            size,
            round: self.config.round_style,
            remote_src,
        }
        .render();

        tracing::debug!(
            target: TRACING_TARGET_RENDER,
            size,
            probed = plan.needs_probe(),
            deferred = remote_src.is_some(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Rendered avatar"
        );

        RenderedAvatar {
            pending_verification: remote_src.map(str::to_owned),
            markup,
        }
    }
}
