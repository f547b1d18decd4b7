//! Session key handling and HKDF-SHA256 sub-key derivation.
//!
//! From the single Argon2id-derived session key we derive:
//! - The **record key** that encrypts account password fields.
//! - A dedicated **HMAC key** for vault file integrity checks.
//!
//! HKDF (RFC 5869) uses the session key as input keying material (IKM)
//! and a context string (`info`) to produce independent sub-keys, so
//! the same key material never serves two purposes directly.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{CandadoError, Result};

/// Length of derived sub-keys (256 bits).
const KEY_LEN: usize = 32;

/// Derive the record-encryption key from the session key.
pub fn derive_record_key(session_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(session_key, b"candado-record-key")
}

/// Derive an HMAC key from the session key.
///
/// This key is used to compute an HMAC over the vault file so wrong
/// master secrets and tampering are detected before any record is
/// decrypted.
pub fn derive_hmac_key(session_key: &[u8]) -> Result<[u8; KEY_LEN]> {
    hkdf_derive(session_key, b"candado-hmac-key")
}

/// Internal helper: run HKDF-SHA256 expand with the given `info`.
///
/// We skip the `extract` step and use the session key directly as the
/// pseudo-random key (PRK), because the session key already has high
/// entropy (it came from Argon2id).
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    // `salt` is None — HKDF will use a zero-filled salt internally.
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| CandadoError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A wrapper around the 32-byte session key that automatically zeroes
/// its memory when dropped.
///
/// The session key exists only for the lifetime of an open vault
/// session.  It is never persisted and never logged.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SessionKey {
    bytes: [u8; KEY_LEN],
}

impl SessionKey {
    /// Create a new `SessionKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to HKDF).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the record-encryption key from this session key.
    pub fn record_key(&self) -> Result<[u8; KEY_LEN]> {
        derive_record_key(&self.bytes)
    }

    /// Derive the vault-file HMAC key from this session key.
    pub fn hmac_key(&self) -> Result<[u8; KEY_LEN]> {
        derive_hmac_key(&self.bytes)
    }
}
