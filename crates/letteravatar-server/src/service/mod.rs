//! Application state and dependency injection.

mod config;
mod verification;

use std::sync::Arc;

use letteravatar_core::AvatarService;
use letteravatar_core::assets::AssetLocator;
use letteravatar_core::config::JsonSettingsStore;
use letteravatar_core::identity::MemoryDirectory;
use letteravatar_core::remote::RemoteAvatarChecker;

pub use crate::service::config::ServiceConfig;
pub use crate::service::verification::VerificationGuard;
pub use crate::{Error, Result};

/// Tracing target for service state assembly.
const TRACING_TARGET: &str = "letteravatar_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub avatars: AvatarService,
    pub verification: VerificationGuard,
}

impl ServiceState {
    /// Creates the state from already assembled services.
    pub fn new(avatars: AvatarService, verification: VerificationGuard) -> Self {
        Self {
            avatars,
            verification,
        }
    }

    /// Initializes application state from configuration.
    ///
    /// Reads the directory snapshot, if any, and keys the verification guard.
    pub fn from_config(config: &ServiceConfig, checker: RemoteAvatarChecker) -> Result<Self> {
        config.validate()?;

        if config.uses_development_secret() {
            tracing::warn!(
                target: TRACING_TARGET,
                "using the development verification secret, set VERIFICATION_SECRET in production"
            );
        }

        let mut builder =
            AvatarService::builder(AssetLocator::new(&config.assets_base_url), checker);

        if let Some(path) = &config.settings_path {
            tracing::info!(
                target: TRACING_TARGET,
                path = %path.display(),
                "persisting avatar settings to file"
            );
            builder = builder.with_settings(Arc::new(JsonSettingsStore::new(path)));
        }

        if let Some(path) = &config.directory_path {
            let directory =
                MemoryDirectory::from_json_file(path).map_err(|source| Error::Load {
                    path: path.clone(),
                    source,
                })?;

            tracing::info!(
                target: TRACING_TARGET,
                path = %path.display(),
                accounts = directory.len(),
                "loaded directory snapshot"
            );
            builder = builder.with_memory_directory(Arc::new(directory));
        }

        let verification = VerificationGuard::new(&config.verification_secret)?;
        Ok(Self::new(builder.build(), verification))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(avatars: AvatarService);
impl_di!(verification: VerificationGuard);
