//! Master-secret authentication gate.
//!
//! `Authenticator` answers one question before a vault session starts:
//! does this secret unlock this vault?  It goes through the exact same
//! key-derivation path as the encryption layer and checks the vault
//! file's HMAC, so a successful authentication guarantees that the
//! subsequent `VaultStore::open` will decrypt cleanly.
//!
//! No record contents are read here, only the file envelope.

use std::path::{Path, PathBuf};

use zeroize::Zeroize;

use crate::crypto::kdf::{derive_session_key_with_params, Argon2Params};
use crate::crypto::keys::SessionKey;
use crate::errors::{CandadoError, Result};
use crate::vault::format;

/// Result of an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No vault exists yet; any non-empty secret is accepted and
    /// becomes the vault's master secret once the caller creates it.
    FirstRun,

    /// The derived key verified the stored vault.
    Unlocked,

    /// The secret does not match the vault's master secret.
    Rejected,
}

/// Validates a supplied master secret against a vault file.
pub struct Authenticator {
    vault_path: PathBuf,
}

impl Authenticator {
    /// Create an authenticator for the vault at `vault_path`.
    pub fn new(vault_path: &Path) -> Self {
        Self {
            vault_path: vault_path.to_path_buf(),
        }
    }

    /// Check `master_secret` against the vault.
    ///
    /// An empty or blank secret is rejected outright, without touching
    /// storage.  A missing vault file means first-run: the attempt
    /// succeeds and the caller should create the vault with this
    /// secret.  Otherwise the secret is accepted iff the key derived
    /// from it verifies the vault file's HMAC.
    pub fn authenticate(&self, master_secret: &str) -> Result<AuthOutcome> {
        if master_secret.trim().is_empty() {
            return Err(CandadoError::EmptyMasterSecret);
        }

        if !self.vault_path.exists() {
            return Ok(AuthOutcome::FirstRun);
        }

        let raw = format::read_vault(&self.vault_path)?;

        let stored = raw.header.argon2_params;
        let params = Argon2Params {
            memory_kib: stored.memory_kib,
            iterations: stored.iterations,
            parallelism: stored.parallelism,
        };
        let mut key_bytes =
            derive_session_key_with_params(master_secret.as_bytes(), &raw.header.salt, &params)?;
        let session_key = SessionKey::new(key_bytes);
        key_bytes.zeroize();

        let mut hmac_key = session_key.hmac_key()?;
        let verified = format::verify_hmac(
            &hmac_key,
            &raw.header_bytes,
            &raw.accounts_bytes,
            &raw.stored_hmac,
        );
        hmac_key.zeroize();

        match verified {
            Ok(()) => Ok(AuthOutcome::Unlocked),
            Err(CandadoError::HmacMismatch) => Ok(AuthOutcome::Rejected),
            Err(e) => Err(e),
        }
    }
}
