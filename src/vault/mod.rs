//! Vault module — encrypted account-record storage.
//!
//! This module provides:
//! - `AccountRecord`, `AccountDto`, and `Violation` types (`account`)
//! - Binary vault file format with HMAC integrity (`format`)
//! - High-level `VaultStore` for creating, opening, and managing vaults (`store`)

pub mod account;
pub mod format;
pub mod store;

// Re-export the most commonly used items.
pub use account::{AccountDto, AccountRecord, RecordState, Violation};
pub use format::{StoredAccount, StoredArgon2Params, VaultHeader};
pub use store::{ImportOutcome, VaultStore};
