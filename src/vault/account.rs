//! Account record types stored inside a vault.
//!
//! An `AccountRecord` is the decrypted, in-memory form of one credential:
//! account name, username, password (plaintext while the session is open),
//! and a free-text memo.  Records are either drafts or persisted; a
//! persisted record's name can no longer change, so renaming means
//! delete + recreate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CandadoError, Result};

/// Suffix appended to an imported account's name when it collides with
/// an existing one.  Applied repeatedly until the name is unique.
pub const DUPLICATE_SUFFIX: &str = " - duplicate";

/// Lifecycle state of a record.
///
/// A draft has never been written to disk and its name is still
/// editable.  After a successful save the record becomes persisted and
/// its name is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Draft,
    Persisted,
}

/// One credential in the decrypted working set.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// Account name, the vault's primary key.  Kept private so renames
    /// must go through `rename`, which enforces the persisted-name rule.
    name: String,

    state: RecordState,

    /// Username for the account, may be empty.
    pub user_name: String,

    /// Plaintext password, may be empty (no password stored).
    pub password: String,

    /// Free-text memo, may be empty.
    pub memo: String,

    /// When this record was first created.
    pub created_at: DateTime<Utc>,

    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    /// Create a new draft with the given name and empty fields.
    pub fn draft(name: &str) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            state: RecordState::Draft,
            user_name: String::new(),
            password: String::new(),
            memo: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a persisted record from its stored parts (used when
    /// opening a vault).
    pub(crate) fn persisted(
        name: String,
        user_name: String,
        password: String,
        memo: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            state: RecordState::Persisted,
            user_name,
            password,
            memo,
            created_at,
            updated_at,
        }
    }

    /// The account name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The account name lowercased, used as the uniqueness key.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RecordState {
        self.state
    }

    /// Returns `true` once the record has been saved at least once.
    pub fn is_persisted(&self) -> bool {
        self.state == RecordState::Persisted
    }

    /// Case-insensitive name match.
    pub fn matches_name(&self, name: &str) -> bool {
        self.normalized_name() == name.to_lowercase()
    }

    /// Change the name of a draft.
    ///
    /// Fails with `NameImmutable` for a persisted record: the name is
    /// the primary key of the saved snapshot and may only change via
    /// delete + recreate.
    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        if self.is_persisted() {
            return Err(CandadoError::NameImmutable(self.name.clone()));
        }
        self.name = new_name.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Flip the record to the persisted state after a successful save.
    pub(crate) fn mark_persisted(&mut self) {
        self.state = RecordState::Persisted;
    }
}

/// A single validation violation found in a working set.
///
/// Returned as data rather than raised, so callers can show every
/// problem at once before re-prompting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A record has an empty account name.
    EmptyAccountName,

    /// Two or more records share this name (case-insensitive).
    DuplicateAccountName(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAccountName => write!(f, "account name is required"),
            Self::DuplicateAccountName(name) => {
                write!(f, "duplicate account name '{name}'")
            }
        }
    }
}

/// Transfer form of an account for import/export files.
///
/// The password travels as ciphertext under the exporting session key,
/// so an export file is only importable by a vault opened with the same
/// master secret.  Missing optional fields default to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDto {
    /// Account name.
    pub name: String,

    /// Username, may be empty.
    #[serde(default)]
    pub user_name: String,

    /// Base64 password ciphertext; empty when no password is stored.
    #[serde(default)]
    pub password: String,

    /// Free-text memo, may be empty.
    #[serde(default)]
    pub memo: String,
}
