//! Letter extraction and size buckets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Returns the character of `name` at `index`.
///
/// Negative indices count from the end, so `-1` is the last character.
/// Indices are in Unicode scalar values, not bytes.
pub fn letter_at(name: &str, index: i32) -> Option<char> {
    if index >= 0 {
        let index = usize::try_from(index).ok()?;
        name.chars().nth(index)
    } else {
        let from_end = usize::try_from(index.unsigned_abs()).ok()?;
        name.chars().rev().nth(from_end - 1)
    }
}

/// Picks the image file name for `name`: the lowercased letter at `index`
/// when it is an ASCII letter, otherwise `unknown`.
pub fn image_name<'a>(name: &str, index: i32, unknown: &'a str) -> std::borrow::Cow<'a, str> {
    match letter_at(name, index) {
        Some(letter) if letter.is_ascii_alphabetic() => {
            letter.to_ascii_lowercase().to_string().into()
        }
        _ => unknown.into(),
    }
}

/// Pixel sizes the letter images are provided in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter)]
pub enum SizeBucket {
    #[strum(serialize = "48")]
    Px48,
    #[strum(serialize = "96")]
    Px96,
    #[strum(serialize = "128")]
    Px128,
    #[strum(serialize = "256")]
    Px256,
    #[strum(serialize = "512")]
    Px512,
}

impl SizeBucket {
    /// Smallest bucket not smaller than `size`; 512 for anything above 256.
    pub fn from_size(size: u32) -> Self {
        Self::iter()
            .find(|bucket| bucket.pixels() >= size)
            .unwrap_or(Self::Px512)
    }

    /// Pixel dimension of the bucket.
    pub const fn pixels(self) -> u32 {
        match self {
            Self::Px48 => 48,
            Self::Px96 => 96,
            Self::Px128 => 128,
            Self::Px256 => 256,
            Self::Px512 => 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_at_positive_and_negative() {
        assert_eq!(letter_at("bob", 0), Some('b'));
        assert_eq!(letter_at("carmen", 2), Some('r'));
        assert_eq!(letter_at("carmen", -1), Some('n'));
        assert_eq!(letter_at("carmen", -6), Some('c'));
        assert_eq!(letter_at("carmen", -7), None);
        assert_eq!(letter_at("carmen", 6), None);
        assert_eq!(letter_at("", 0), None);
        assert_eq!(letter_at("Élan", 0), Some('É'));
    }

    #[test]
    fn image_name_for_letters() {
        for name in ["alice", "Alice", "zed", "Zed"] {
            let expected = name.chars().next().unwrap().to_ascii_lowercase().to_string();
            assert_eq!(image_name(name, 0, "mystery"), expected);
        }
    }

    #[test]
    fn image_name_falls_back_to_unknown() {
        assert_eq!(image_name("Álice", 0, "mystery"), "mystery");
        assert_eq!(image_name("", 0, "mystery"), "mystery");
        assert_eq!(image_name("7even", 0, "mystery"), "mystery");
        assert_eq!(image_name("bob", 5, "mystery"), "mystery");
        assert_eq!(image_name("bob", -4, "mystery"), "mystery");
        assert_eq!(image_name("İris", 0, "mystery"), "mystery");
        assert_eq!(image_name("\u{212A}elvin", 0, "mystery"), "mystery");
        assert_eq!(image_name("\u{212B}ngstrom", 0, "mystery"), "mystery");
        assert_eq!(image_name("bob", 0, ""), "b");
        assert_eq!(image_name("", 0, ""), "");
    }

    #[test]
    fn bucket_rounds_up() {
        let cases = [
            (1, 48),
            (48, 48),
            (49, 96),
            (70, 96),
            (96, 96),
            (97, 128),
            (128, 128),
            (200, 256),
            (256, 256),
            (257, 512),
            (512, 512),
            (2048, 512),
        ];
        for (size, expected) in cases {
            assert_eq!(SizeBucket::from_size(size).pixels(), expected, "size {size}");
        }
    }

    #[test]
    fn bucket_display_is_pixels() {
        for bucket in SizeBucket::iter() {
            assert_eq!(bucket.to_string(), bucket.pixels().to_string());
        }
    }
}
