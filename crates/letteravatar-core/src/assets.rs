//! Addresses of the bundled letter images.

use serde::{Deserialize, Serialize};

use crate::config::AvatarConfiguration;
use crate::letter::{SizeBucket, image_name};

/// Default location the letter images are served from.
pub const DEFAULT_ASSETS_BASE_URL: &str = "/assets/images";

/// Builds `<base>/<set>/<bucket>/<letter>.<format>` addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLocator {
    base_url: String,
}

impl AssetLocator {
    /// Creates a locator rooted at `base_url`. Trailing slashes are dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Root the asset paths are built under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Address of the letter image for `name` at the requested `size`.
    pub fn letter_image(&self, name: &str, size: u32, config: &AvatarConfiguration) -> String {
        let file = image_name(name, config.letter_index, &config.unknown_image_name);
        self.image(&config.image_set, SizeBucket::from_size(size), &file, &config.image_format)
    }

    /// Address of an arbitrary image in the tree.
    pub fn image(&self, image_set: &str, bucket: SizeBucket, file: &str, format: &str) -> String {
        format!("{}/{image_set}/{bucket}/{file}.{format}", self.base_url)
    }
}

impl Default for AssetLocator {
    fn default() -> Self {
        Self::new(DEFAULT_ASSETS_BASE_URL)
    }
}
