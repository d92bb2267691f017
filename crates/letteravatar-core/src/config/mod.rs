//! Avatar configuration and the store it is loaded from.

mod store;

use serde::{Deserialize, Serialize};

pub use self::store::{
    JsonSettingsStore, MemorySettingsStore, SettingsStore, StoredSettings, load_configuration,
};

/// Default values for [`AvatarConfiguration`].
pub mod defaults {
    /// Query the remote avatar service before falling back to letters.
    pub const USE_REMOTE_SERVICE: bool = true;
    /// Offset of the character taken from the display name.
    pub const LETTER_INDEX: i32 = 0;
    /// Name of the image set directory.
    pub const IMAGE_SET: &str = "default";
    /// File extension of the letter images.
    pub const IMAGE_FORMAT: &str = "png";
    /// Render avatars with the round style class.
    pub const ROUND_STYLE: bool = false;
    /// File name used when no letter can be extracted.
    pub const UNKNOWN_IMAGE_NAME: &str = "mystery";
    /// Priority at which the host wires the avatar hooks.
    pub const FILTER_PRIORITY: i32 = 10;
    /// Defer the remote check to the browser.
    pub const USE_CLIENT_SIDE_VERIFICATION: bool = true;
    /// Let the remote service fall back to the letter image itself.
    pub const REMOTE_DEFAULT_FALLBACK: bool = false;
}

/// Snapshot of the avatar settings used for one request cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarConfiguration {
    /// Whether the remote avatar service is consulted at all.
    pub use_remote_service: bool,
    /// Character offset into the display name; negative counts from the end.
    pub letter_index: i32,
    /// Image set directory under the asset root.
    pub image_set: String,
    /// Image file extension.
    pub image_format: String,
    /// Adds the `round-avatars` class to the markup.
    pub round_style: bool,
    /// File name used when the letter is missing or outside `a`-`z`.
    pub unknown_image_name: String,
    /// Host hook priority. Carried for the host, unused by rendering.
    pub filter_priority: i32,
    /// Attach the remote URL for a browser-side check instead of probing.
    pub use_client_side_verification: bool,
    /// Delegate the fallback to the remote service through its `d=` parameter.
    pub remote_default_fallback: bool,
}

impl Default for AvatarConfiguration {
    fn default() -> Self {
        Self {
            use_remote_service: defaults::USE_REMOTE_SERVICE,
            letter_index: defaults::LETTER_INDEX,
            image_set: defaults::IMAGE_SET.to_owned(),
            image_format: defaults::IMAGE_FORMAT.to_owned(),
            round_style: defaults::ROUND_STYLE,
            unknown_image_name: defaults::UNKNOWN_IMAGE_NAME.to_owned(),
            filter_priority: defaults::FILTER_PRIORITY,
            use_client_side_verification: defaults::USE_CLIENT_SIDE_VERIFICATION,
            remote_default_fallback: defaults::REMOTE_DEFAULT_FALLBACK,
        }
    }
}

impl AvatarConfiguration {
    /// Returns a configuration that never talks to the remote service.
    pub fn local_only() -> Self {
        Self {
            use_remote_service: false,
            ..Self::default()
        }
    }

    /// Sets the letter index.
    pub fn with_letter_index(mut self, letter_index: i32) -> Self {
        self.letter_index = letter_index;
        self
    }

    /// Sets the round style flag.
    pub fn with_round_style(mut self, round_style: bool) -> Self {
        self.round_style = round_style;
        self
    }

    /// Switches to the synchronous existence check.
    pub fn with_synchronous_verification(mut self) -> Self {
        self.use_remote_service = true;
        self.use_client_side_verification = false;
        self.remote_default_fallback = false;
        self
    }

    /// Switches to the delegated fallback through the remote service.
    pub fn with_remote_default_fallback(mut self) -> Self {
        self.use_remote_service = true;
        self.use_client_side_verification = false;
        self.remote_default_fallback = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration() {
        let config = AvatarConfiguration::default();
        assert!(config.use_remote_service);
        assert_eq!(config.letter_index, 0);
        assert_eq!(config.image_set, "default");
        assert_eq!(config.image_format, "png");
        assert!(!config.round_style);
        assert_eq!(config.unknown_image_name, "mystery");
        assert_eq!(config.filter_priority, 10);
        assert!(config.use_client_side_verification);
        assert!(!config.remote_default_fallback);
    }

    #[test]
    fn strategy_builders() {
        let sync = AvatarConfiguration::local_only().with_synchronous_verification();
        assert!(sync.use_remote_service);
        assert!(!sync.use_client_side_verification);

        let delegated = AvatarConfiguration::default().with_remote_default_fallback();
        assert!(delegated.remote_default_fallback);
        assert!(!delegated.use_client_side_verification);
    }
}
