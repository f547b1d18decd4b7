use std::path::PathBuf;
use thiserror::Error;

use crate::vault::account::Violation;

/// All errors that can occur in Candado.
#[derive(Debug, Error)]
pub enum CandadoError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong master secret or corrupted data")]
    DecryptionFailed,

    #[error("Could not decrypt the password for account '{0}' — vault data is corrupted")]
    RecordDecryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Integrity check failed — wrong master secret or tampered vault file")]
    HmacMismatch,

    #[error("HMAC error: {0}")]
    HmacError(String),

    // --- Account errors ---
    #[error("Validation failed: {}", format_violations(.0))]
    Validation(Vec<Violation>),

    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Account '{0}' has been saved — its name can no longer be changed")]
    NameImmutable(String),

    // --- Authentication errors ---
    #[error("Master secret cannot be empty")]
    EmptyMasterSecret,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for Candado results.
pub type Result<T> = std::result::Result<T, CandadoError>;

/// Join validation violations into a single human-readable line.
fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
