//! Identity resolution: from a subject reference to a `(name, email)` pair.

mod directory;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

pub use self::directory::{
    Account, AnonymousAuthor, ContentMetadata, DirectorySnapshot, MemoryDirectory, UserDirectory,
};
use crate::TRACING_TARGET_IDENTITY;

/// What the host asked an avatar for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubjectReference {
    /// A numeric account id.
    UserId { id: u64 },
    /// A user-like object, which may not carry an id.
    User {
        #[serde(default)]
        user_id: Option<u64>,
    },
    /// An email address or a bare display name.
    Text { value: String },
    /// No usable reference; optionally a raw string the host passed along.
    Anonymous {
        #[serde(default)]
        raw: Option<String>,
    },
    /// The logged-in user from [`ContextHints::current_user`].
    CurrentUser,
    /// A stored comment with its author fields.
    Comment {
        #[serde(default)]
        author_name: String,
        #[serde(default)]
        author_email: String,
    },
}

/// Request context supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextHints {
    /// Content item currently being rendered.
    #[serde(default)]
    pub post_id: Option<u64>,
    /// Account id of the logged-in user.
    #[serde(default)]
    pub current_user: Option<u64>,
}

/// Best-effort identity used for avatar selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub display_name: String,
    pub email: String,
}

impl ResolvedIdentity {
    /// Creates a normalized identity.
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
        }
        .normalized()
    }

    /// Copies one field into the other when it is empty.
    ///
    /// Afterwards either both fields are empty or neither is.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.display_name.is_empty() {
            self.display_name = self.email.clone();
        } else if self.email.is_empty() {
            self.email = self.display_name.clone();
        }
        self
    }

    /// True when nothing could be resolved.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_empty() && self.email.is_empty()
    }
}

impl From<Account> for ResolvedIdentity {
    fn from(account: Account) -> Self {
        Self::new(account.display_name, account.email)
    }
}

/// Returns true when `value` passes the email syntax check.
pub fn is_email(value: &str) -> bool {
    !value.is_empty() && value.validate_email()
}

/// Resolves subject references against the host's lookups.
#[derive(Clone, Copy)]
pub struct IdentityResolver<'a> {
    directory: &'a dyn UserDirectory,
    metadata: &'a dyn ContentMetadata,
}

impl<'a> IdentityResolver<'a> {
    /// Creates a resolver over the given lookups.
    pub fn new(directory: &'a dyn UserDirectory, metadata: &'a dyn ContentMetadata) -> Self {
        Self {
            directory,
            metadata,
        }
    }

    /// Resolves `subject`. Never fails; unknown inputs yield empty fields.
    pub fn resolve(&self, subject: &SubjectReference, hints: &ContextHints) -> ResolvedIdentity {
        let identity = match subject {
            SubjectReference::Comment {
                author_name,
                author_email,
            } => ResolvedIdentity::new(author_name.as_str(), author_email.as_str()),
            SubjectReference::UserId { id }
            | SubjectReference::User { user_id: Some(id) } => match self.directory.find_by_id(*id) {
                Some(account) => account.into(),
                None => {
                    tracing::debug!(
                        target: TRACING_TARGET_IDENTITY,
                        user_id = id,
                        "No account for user id, falling back to anonymous metadata"
                    );
                    self.resolve_anonymous(hints, None)
                }
            },
            SubjectReference::Text { value } => self.resolve_text(value.trim()),
            SubjectReference::User { user_id: None } => self.resolve_anonymous(hints, None),
            SubjectReference::Anonymous { raw } => self.resolve_anonymous(hints, raw.as_deref()),
            SubjectReference::CurrentUser => hints
                .current_user
                .and_then(|id| self.directory.find_by_id(id))
                .map(ResolvedIdentity::from)
                .unwrap_or_default(),
        };

        tracing::trace!(
            target: TRACING_TARGET_IDENTITY,
            resolved = !identity.is_empty(),
            "Resolved avatar identity"
        );

        identity
    }

    fn resolve_text(&self, value: &str) -> ResolvedIdentity {
        if !is_email(value) {
            return ResolvedIdentity::new(value, "");
        }

        match self.directory.find_by_email(value) {
            Some(account) => account.into(),
            None => ResolvedIdentity::new("", value),
        }
    }

    fn resolve_anonymous(&self, hints: &ContextHints, raw: Option<&str>) -> ResolvedIdentity {
        let author = hints
            .post_id
            .and_then(|post_id| self.metadata.anonymous_author(post_id))
            .filter(|author| !author.is_empty());

        match (author, raw) {
            (Some(author), _) => ResolvedIdentity::new(author.name, author.email),
            (None, Some(raw)) => ResolvedIdentity::new("", raw.trim()),
            (None, None) => ResolvedIdentity::default(),
        }
    }
}

impl std::fmt::Debug for IdentityResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}
