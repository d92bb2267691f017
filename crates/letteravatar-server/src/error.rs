//! Errors raised while assembling the service state.
//!
//! Request handling reports [`handler::Error`](crate::handler::Error) instead.

use std::borrow::Cow;
use std::path::PathBuf;

/// Result of building the service state.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why the service state could not be built.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    Config(Cow<'static, str>),

    /// A file named in the configuration could not be read or parsed.
    #[error("cannot load {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: letteravatar_core::Error,
    },
}

impl Error {
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn config_error_message() {
        let error = Error::config("verification secret is too short");
        assert_eq!(
            error.to_string(),
            "invalid configuration: verification secret is too short"
        );
    }

    #[test]
    fn load_error_keeps_core_source() {
        let error = Error::Load {
            path: PathBuf::from("/srv/directory.json"),
            source: letteravatar_core::Error::storage().with_message("missing file"),
        };

        assert_eq!(error.to_string(), "cannot load /srv/directory.json");
        let source = error.source().map(ToString::to_string).unwrap_or_default();
        assert!(source.contains("missing file"));
    }
}
