//! Account and anonymous-author lookups supplied by the host.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub display_name: String,
    pub email: String,
}

/// Name and email left by a commenter without an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymousAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl AnonymousAuthor {
    /// True when neither field carries a value.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

/// User account lookups.
pub trait UserDirectory: Send + Sync {
    /// Finds an account by its numeric id.
    fn find_by_id(&self, id: u64) -> Option<Account>;

    /// Finds an account by its primary email, case-insensitively.
    fn find_by_email(&self, email: &str) -> Option<Account>;
}

/// Metadata attached to content items by the discussion subsystem.
pub trait ContentMetadata: Send + Sync {
    /// Anonymous author fields of the given content item.
    fn anonymous_author(&self, post_id: u64) -> Option<AnonymousAuthor>;
}

/// Serialized form of a [`MemoryDirectory`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySnapshot {
    pub accounts: Vec<Account>,
    pub anonymous_authors: HashMap<u64, AnonymousAuthor>,
}

/// In-memory directory serving both accounts and anonymous-author metadata.
///
/// Accounts are kept in id order, so an email shared by several accounts
/// resolves to the lowest id.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    accounts: RwLock<BTreeMap<u64, Account>>,
    anonymous_authors: RwLock<HashMap<u64, AnonymousAuthor>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from a snapshot.
    pub fn from_snapshot(snapshot: DirectorySnapshot) -> Self {
        let accounts = snapshot
            .accounts
            .into_iter()
            .map(|account| (account.id, account))
            .collect();

        Self {
            accounts: RwLock::new(accounts),
            anonymous_authors: RwLock::new(snapshot.anonymous_authors),
        }
    }

    /// Reads a JSON snapshot from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let snapshot: DirectorySnapshot = serde_json::from_str(&content)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Adds or replaces an account.
    pub fn insert_account(&self, account: Account) -> Result<()> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| Error::storage().with_message("directory lock poisoned"))?;
        accounts.insert(account.id, account);
        Ok(())
    }

    /// Attaches anonymous author fields to a content item.
    pub fn insert_anonymous_author(&self, post_id: u64, author: AnonymousAuthor) -> Result<()> {
        let mut authors = self
            .anonymous_authors
            .write()
            .map_err(|_| Error::storage().with_message("directory lock poisoned"))?;
        authors.insert(post_id, author);
        Ok(())
    }

    /// Number of accounts held.
    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or_default()
    }

    /// True when no accounts are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserDirectory for MemoryDirectory {
    fn find_by_id(&self, id: u64) -> Option<Account> {
        self.accounts.read().ok()?.get(&id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<Account> {
        let email = email.trim();
        self.accounts
            .read()
            .ok()?
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned()
    }
}

impl ContentMetadata for MemoryDirectory {
    fn anonymous_author(&self, post_id: u64) -> Option<AnonymousAuthor> {
        self.anonymous_authors.read().ok()?.get(&post_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carmen() -> Account {
        Account {
            id: 42,
            display_name: "Carmen".to_owned(),
            email: "c@x.com".to_owned(),
        }
    }

    #[test]
    fn lookup_by_id_and_email() {
        let directory = MemoryDirectory::new();
        directory.insert_account(carmen()).unwrap();

        assert_eq!(directory.find_by_id(42), Some(carmen()));
        assert_eq!(directory.find_by_email(" C@X.com "), Some(carmen()));
        assert!(directory.find_by_id(7).is_none());
        assert!(directory.find_by_email("nobody@x.com").is_none());
    }

    #[test]
    fn shared_email_resolves_to_lowest_id() {
        let directory = MemoryDirectory::new();
        for (id, name) in [(90, "Carmen Alt"), (42, "Carmen"), (77, "C. Old")] {
            let account = Account {
                id,
                display_name: name.to_owned(),
                email: "c@x.com".to_owned(),
            };
            directory.insert_account(account).unwrap();
        }

        assert_eq!(directory.find_by_email("C@x.com"), Some(carmen()));
    }

    #[test]
    fn snapshot_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.json");
        std::fs::write(
            &path,
            r#"{
                "accounts": [{ "id": 42, "display_name": "Carmen", "email": "c@x.com" }],
                "anonymous_authors": { "9": { "name": "Guest" } }
            }"#,
        )
        .unwrap();

        let directory = MemoryDirectory::from_json_file(&path).unwrap();
        assert_eq!(directory.len(), 1);
        let author = directory.anonymous_author(9).unwrap();
        assert_eq!(author.name, "Guest");
        assert!(author.email.is_empty());
    }

    #[test]
    fn missing_snapshot_file_is_storage_error() {
        let error = MemoryDirectory::from_json_file("/nonexistent/directory.json").unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::Storage);
    }
}
