//! Remote avatar service addressing and existence checks.

mod probe;

use std::fmt;

use md5::{Digest, Md5};
use url::Url;
use url::form_urlencoded::Serializer;

pub use self::probe::{AvatarProbe, RemoteAvatarChecker};
use crate::identity::is_email;
use crate::{Error, Result};

/// Origin of the remote avatar service.
pub const REMOTE_ORIGIN: &str = "https://secure.gravatar.com";

/// Host suffix accepted when parsing remote avatar URLs.
pub const REMOTE_HOST: &str = "gravatar.com";

/// Rating appended to rendered remote URLs.
pub const REMOTE_RATING: &str = "g";

/// Hash of the trimmed, lowercased email.
///
/// Emails that fail the syntax check are hashed as the empty string.
pub fn email_hash(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let input = if is_email(&normalized) {
        normalized.as_str()
    } else {
        ""
    };
    hex::encode(Md5::digest(input.as_bytes()))
}

/// What the remote service returns for hashes without a custom image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultMode {
    /// Respond with `404 Not Found`.
    NotFound,
    /// Redirect to the given image.
    Image(String),
}

impl DefaultMode {
    fn as_query_value(&self) -> &str {
        match self {
            Self::NotFound => "404",
            Self::Image(url) => url,
        }
    }
}

/// A URL on the remote avatar service.
///
/// Always addresses [`REMOTE_ORIGIN`]; parsing keeps only the hash and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAvatarUrl {
    hash: String,
    query: String,
}

impl RemoteAvatarUrl {
    /// Address of the avatar for `email` at `size`.
    pub fn for_email(email: &str, size: u32) -> Self {
        Self::from_hash(email_hash(email), size, None)
    }

    /// Address of the avatar for `email`, with the service falling back to
    /// `default` when no custom image exists.
    pub fn for_email_with_default(email: &str, size: u32, default: &DefaultMode) -> Self {
        Self::from_hash(email_hash(email), size, Some(default))
    }

    /// Address of the avatar for `email` without any query parameters.
    pub fn from_email(email: &str) -> Self {
        Self {
            hash: email_hash(email),
            query: String::new(),
        }
    }

    fn from_hash(hash: String, size: u32, default: Option<&DefaultMode>) -> Self {
        let mut query = Serializer::new(String::new());
        query.append_pair("s", &size.to_string());
        if let Some(default) = default {
            query.append_pair("d", default.as_query_value());
        }
        query.append_pair("r", REMOTE_RATING);

        Self {
            hash,
            query: query.finish(),
        }
    }

    /// Parses a URL that must point at an avatar on the remote service.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_input().with_message("unsupported URL scheme"));
        }

        if url.port().is_some() {
            return Err(Error::invalid_input().with_message("unexpected port in remote avatar URL"));
        }

        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let on_service = host == REMOTE_HOST || host.ends_with(&format!(".{REMOTE_HOST}"));
        if !on_service {
            return Err(Error::invalid_input().with_message("not a remote avatar URL"));
        }

        let segments: Vec<&str> = url.path_segments().map(Iterator::collect).unwrap_or_default();
        let hash = match segments.as_slice() {
            ["avatar", hash] if is_hash(hash) => hash.to_ascii_lowercase(),
            _ => return Err(Error::invalid_input().with_message("malformed avatar path")),
        };

        Ok(Self {
            hash,
            query: url.query().unwrap_or_default().to_owned(),
        })
    }

    /// Email hash this URL addresses.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Address asking the service for `404` instead of a default image.
    ///
    /// Any existing query is dropped.
    pub fn lookup_url(&self) -> String {
        let query = Serializer::new(String::new())
            .append_pair("d", DefaultMode::NotFound.as_query_value())
            .finish();
        format!("{REMOTE_ORIGIN}/avatar/{}?{query}", self.hash)
    }
}

impl fmt::Display for RemoteAvatarUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REMOTE_ORIGIN}/avatar/{}", self.hash)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}

fn is_hash(value: &str) -> bool {
    matches!(value.len(), 32 | 64) && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_HASH: &str = "d41d8cd98f00b204e9800998ecf8427e";

    #[test]
    fn email_hash_normalizes() {
        let expected = hex::encode(Md5::digest(b"c@x.com"));
        assert_eq!(email_hash("  C@X.com "), expected);
        assert_eq!(email_hash("c@x.com"), expected);
    }

    #[test]
    fn invalid_email_hashes_empty_string() {
        assert_eq!(email_hash("bob"), EMPTY_HASH);
        assert_eq!(email_hash(""), EMPTY_HASH);
    }

    #[test]
    fn rendered_url_shape() {
        let url = RemoteAvatarUrl::for_email("c@x.com", 96);
        assert_eq!(
            url.to_string(),
            format!("https://secure.gravatar.com/avatar/{}?s=96&r=g", email_hash("c@x.com"))
        );
    }

    #[test]
    fn rendered_url_with_default_image() {
        let default = DefaultMode::Image("https://blog.example.com/a/default/96/c.png".to_owned());
        let url = RemoteAvatarUrl::for_email_with_default("c@x.com", 70, &default);
        assert!(url.to_string().contains(
            "?s=70&d=https%3A%2F%2Fblog.example.com%2Fa%2Fdefault%2F96%2Fc.png&r=g"
        ));
    }

    #[test]
    fn parse_strips_query_for_lookup() {
        let raw = format!("https://secure.gravatar.com/avatar/{EMPTY_HASH}?s=96&r=g");
        let url = RemoteAvatarUrl::parse(&raw).unwrap();
        assert_eq!(url.hash(), EMPTY_HASH);
        assert_eq!(url.to_string(), raw);
        assert_eq!(
            url.lookup_url(),
            format!("https://secure.gravatar.com/avatar/{EMPTY_HASH}?d=404")
        );
    }

    #[test]
    fn parse_accepts_service_subdomains() {
        let raw = format!("http://www.gravatar.com/avatar/{}", EMPTY_HASH.to_uppercase());
        let url = RemoteAvatarUrl::parse(&raw).unwrap();
        assert_eq!(url.hash(), EMPTY_HASH);
        assert_eq!(
            url.lookup_url(),
            format!("https://secure.gravatar.com/avatar/{EMPTY_HASH}?d=404")
        );
    }

    #[test]
    fn parse_rejects_explicit_ports() {
        for raw in [
            "http://secure.gravatar.com:25/avatar/d41d8cd98f00b204e9800998ecf8427e?s=1",
            "https://secure.gravatar.com:8443/avatar/d41d8cd98f00b204e9800998ecf8427e",
        ] {
            let error = RemoteAvatarUrl::parse(raw).unwrap_err();
            assert_eq!(error.kind, crate::ErrorKind::InvalidInput, "{raw}");
        }
    }

    #[test]
    fn parse_rejects_foreign_urls() {
        for raw in [
            "not a url",
            "ftp://secure.gravatar.com/avatar/d41d8cd98f00b204e9800998ecf8427e",
            "https://evil.example.com/avatar/d41d8cd98f00b204e9800998ecf8427e",
            "https://notgravatar.com/avatar/d41d8cd98f00b204e9800998ecf8427e",
            "https://secure.gravatar.com/profile/d41d8cd98f00b204e9800998ecf8427e",
            "https://secure.gravatar.com/avatar/xyz",
        ] {
            let error = RemoteAvatarUrl::parse(raw).unwrap_err();
            assert_eq!(error.kind, crate::ErrorKind::InvalidInput, "{raw}");
        }
    }
}
