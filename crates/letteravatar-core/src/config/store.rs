//! Persistent settings record and the loader that back-fills it.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::{AvatarConfiguration, defaults};
use crate::{Error, Result, TRACING_TARGET_CONFIG};

/// Settings as persisted by the host. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredSettings {
    pub use_remote_service: Option<bool>,
    pub letter_index: Option<i32>,
    pub image_set: Option<String>,
    pub image_format: Option<String>,
    pub round_style: Option<bool>,
    pub unknown_image_name: Option<String>,
    pub filter_priority: Option<i32>,
    pub use_client_side_verification: Option<bool>,
    pub remote_default_fallback: Option<bool>,
}

impl StoredSettings {
    /// Number of fields that are not populated.
    pub fn missing_fields(&self) -> usize {
        [
            self.use_remote_service.is_none(),
            self.letter_index.is_none(),
            self.image_set.is_none(),
            self.image_format.is_none(),
            self.round_style.is_none(),
            self.unknown_image_name.is_none(),
            self.filter_priority.is_none(),
            self.use_client_side_verification.is_none(),
            self.remote_default_fallback.is_none(),
        ]
        .into_iter()
        .filter(|missing| *missing)
        .count()
    }

    /// Fills every missing field with its default.
    pub fn into_configuration(self) -> AvatarConfiguration {
        AvatarConfiguration {
            use_remote_service: self
                .use_remote_service
                .unwrap_or(defaults::USE_REMOTE_SERVICE),
            letter_index: self.letter_index.unwrap_or(defaults::LETTER_INDEX),
            image_set: self
                .image_set
                .unwrap_or_else(|| defaults::IMAGE_SET.to_owned()),
            image_format: self
                .image_format
                .unwrap_or_else(|| defaults::IMAGE_FORMAT.to_owned()),
            round_style: self.round_style.unwrap_or(defaults::ROUND_STYLE),
            unknown_image_name: self
                .unknown_image_name
                .unwrap_or_else(|| defaults::UNKNOWN_IMAGE_NAME.to_owned()),
            filter_priority: self.filter_priority.unwrap_or(defaults::FILTER_PRIORITY),
            use_client_side_verification: self
                .use_client_side_verification
                .unwrap_or(defaults::USE_CLIENT_SIDE_VERIFICATION),
            remote_default_fallback: self
                .remote_default_fallback
                .unwrap_or(defaults::REMOTE_DEFAULT_FALLBACK),
        }
    }
}

impl From<AvatarConfiguration> for StoredSettings {
    fn from(config: AvatarConfiguration) -> Self {
        Self {
            use_remote_service: Some(config.use_remote_service),
            letter_index: Some(config.letter_index),
            image_set: Some(config.image_set),
            image_format: Some(config.image_format),
            round_style: Some(config.round_style),
            unknown_image_name: Some(config.unknown_image_name),
            filter_priority: Some(config.filter_priority),
            use_client_side_verification: Some(config.use_client_side_verification),
            remote_default_fallback: Some(config.remote_default_fallback),
        }
    }
}

/// Host-provided key/value settings storage.
pub trait SettingsStore: Send + Sync {
    /// Reads the settings record, `None` when it was never written.
    fn load(&self) -> Result<Option<StoredSettings>>;

    /// Replaces the settings record.
    fn save(&self, settings: &StoredSettings) -> Result<()>;
}

/// Loads the configuration snapshot for one request cycle.
///
/// Absent or partial records are completed with defaults and written back.
/// Storage failures are logged and the defaults are used for this cycle.
pub fn load_configuration(store: &dyn SettingsStore) -> AvatarConfiguration {
    let stored = match store.load() {
        Ok(stored) => stored,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET_CONFIG,
                error = %error,
                "Failed to read avatar settings, using defaults"
            );
            return AvatarConfiguration::default();
        }
    };

    let (config, write_back) = match stored {
        Some(stored) => {
            let missing = stored.missing_fields();
            if missing > 0 {
                tracing::debug!(
                    target: TRACING_TARGET_CONFIG,
                    missing_fields = missing,
                    "Back-filling partial avatar settings"
                );
            }
            (stored.into_configuration(), missing > 0)
        }
        None => {
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                "No avatar settings found, writing defaults"
            );
            (AvatarConfiguration::default(), true)
        }
    };

    if write_back {
        let record = StoredSettings::from(config.clone());
        if let Err(error) = store.save(&record) {
            tracing::warn!(
                target: TRACING_TARGET_CONFIG,
                error = %error,
                "Failed to persist completed avatar settings"
            );
        }
    }

    config
}

/// Settings kept in process memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: RwLock<Option<StoredSettings>>,
}

impl MemorySettingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given record.
    pub fn with_settings(settings: StoredSettings) -> Self {
        Self {
            inner: RwLock::new(Some(settings)),
        }
    }

    /// Returns the current record.
    pub fn snapshot(&self) -> Option<StoredSettings> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<StoredSettings>> {
        let guard = self
            .inner
            .read()
            .map_err(|_| Error::storage().with_message("settings lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, settings: &StoredSettings) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| Error::storage().with_message("settings lock poisoned"))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Settings persisted as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Option<StoredSettings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(Some(settings))
    }

    fn save(&self, settings: &StoredSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
