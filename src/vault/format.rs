//! Binary vault file format and HMAC integrity verification.
//!
//! A `.vault` file has this layout:
//!
//! ```text
//! [CNDO: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][accounts JSON][HMAC-SHA256: 32 bytes]
//! ```
//!
//! - **Magic** (`CNDO`): identifies the file as a Candado vault.
//! - **Version**: format version (currently `1`).
//! - **Header length**: little-endian u32 telling us where the header
//!   JSON ends and the accounts JSON begins.
//! - **Header JSON**: serialized `VaultHeader`.
//! - **Accounts JSON**: serialized `Vec<StoredAccount>`.
//! - **HMAC-SHA256**: 32-byte tag computed over header + accounts bytes
//!   with a key derived from the session key, so a wrong master secret
//!   is caught here before any record is decrypted.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::{CandadoError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"CNDO";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Size of the HMAC tag appended to the file (SHA-256 = 32 bytes).
const HMAC_LEN: usize = 32;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

// ---------------------------------------------------------------------------
// Header and stored records
// ---------------------------------------------------------------------------

/// Argon2 parameters stored in the vault header so the exact same
/// KDF settings are used when re-opening.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StoredArgon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for StoredArgon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Metadata stored at the beginning of a vault file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultHeader {
    /// Format version.
    pub version: u8,

    /// The salt used for Argon2id key derivation (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// When this vault was first created.
    pub created_at: DateTime<Utc>,

    /// Argon2 params used at vault creation (stored so open uses the same).
    pub argon2_params: StoredArgon2Params,
}

/// The persisted form of one account record.
///
/// Only the password field is ciphertext; name, username, and memo are
/// stored in the clear, matching the working-set layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAccount {
    /// Account name, unique (case-insensitive) within the vault.
    pub name: String,

    /// Username, may be empty.
    pub user_name: String,

    /// Base64 password ciphertext; empty string when no password is stored.
    pub encrypted_password: String,

    /// Free-text memo, may be empty.
    pub memo: String,

    /// When this account was first created.
    pub created_at: DateTime<Utc>,

    /// When this account was last updated.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Write a vault file to disk **atomically**.
///
/// 1. Serialize header and accounts to JSON.
/// 2. Compute HMAC over header + accounts bytes.
/// 3. Write to a temp file in the same directory.
/// 4. Rename temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn write_vault(
    path: &Path,
    header: &VaultHeader,
    accounts: &[StoredAccount],
    hmac_key: &[u8],
) -> Result<()> {
    let header_bytes = serde_json::to_vec(header)
        .map_err(|e| CandadoError::SerializationError(format!("header: {e}")))?;
    let accounts_bytes = serde_json::to_vec(accounts)
        .map_err(|e| CandadoError::SerializationError(format!("accounts: {e}")))?;

    let hmac_tag = compute_hmac(hmac_key, &header_bytes, &accounts_bytes)?;

    // Build the binary blob.
    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        CandadoError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;
    let total = PREFIX_LEN + header_bytes.len() + accounts_bytes.len() + HMAC_LEN;
    let mut buf = Vec::with_capacity(total);

    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header_len.to_le_bytes()); // 4 bytes LE
    buf.extend_from_slice(&header_bytes); // header JSON
    buf.extend_from_slice(&accounts_bytes); // accounts JSON
    buf.extend_from_slice(&hmac_tag); // 32 bytes

    // Atomic write: write to a temp file, then rename.
    // The temp file is in the same directory so rename is guaranteed
    // to be atomic on the same filesystem.
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, &buf)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Raw data read from a vault file on disk.
///
/// Keeps the original bytes so the HMAC can be verified over the
/// exact bytes that were written — no re-serialization needed.
pub struct RawVault {
    pub header: VaultHeader,
    pub accounts: Vec<StoredAccount>,
    /// The raw header JSON bytes exactly as stored on disk.
    pub header_bytes: Vec<u8>,
    /// The raw accounts JSON bytes exactly as stored on disk.
    pub accounts_bytes: Vec<u8>,
    /// The HMAC tag stored at the end of the file.
    pub stored_hmac: Vec<u8>,
}

/// Read a vault file from disk and return its parts **with raw bytes**.
///
/// The caller should verify the HMAC over `header_bytes` and
/// `accounts_bytes` (the original bytes from disk) before trusting
/// the deserialized data.
pub fn read_vault(path: &Path) -> Result<RawVault> {
    if !path.exists() {
        return Err(CandadoError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;

    // Minimum size: prefix + HMAC.
    let min_size = PREFIX_LEN + HMAC_LEN;
    if data.len() < min_size {
        return Err(CandadoError::InvalidVaultFormat(
            "file too small to be a valid vault".into(),
        ));
    }

    // --- Parse the fixed-size prefix ---

    if &data[0..4] != MAGIC {
        return Err(CandadoError::InvalidVaultFormat(
            "missing CNDO magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(CandadoError::InvalidVaultFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let header_len_u32 = u32::from_le_bytes(
        data[5..9]
            .try_into()
            .map_err(|_| CandadoError::InvalidVaultFormat("bad header length".into()))?,
    );
    let header_len = usize::try_from(header_len_u32).map_err(|_| {
        CandadoError::InvalidVaultFormat(format!(
            "header length {header_len_u32} exceeds platform address space"
        ))
    })?;

    let header_end = PREFIX_LEN + header_len;
    if header_end + HMAC_LEN > data.len() {
        return Err(CandadoError::InvalidVaultFormat(
            "header length exceeds file size".into(),
        ));
    }

    // --- Extract the three variable-length sections as raw bytes ---

    let header_bytes = data[PREFIX_LEN..header_end].to_vec();
    let accounts_end = data.len() - HMAC_LEN;
    let accounts_bytes = data[header_end..accounts_end].to_vec();
    let stored_hmac = data[accounts_end..].to_vec();

    // --- Deserialize from the raw bytes ---

    let header: VaultHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| CandadoError::InvalidVaultFormat(format!("header JSON: {e}")))?;

    let accounts: Vec<StoredAccount> = serde_json::from_slice(&accounts_bytes)
        .map_err(|e| CandadoError::InvalidVaultFormat(format!("accounts JSON: {e}")))?;

    Ok(RawVault {
        header,
        accounts,
        header_bytes,
        accounts_bytes,
        stored_hmac,
    })
}

/// Compute HMAC-SHA256 over header + accounts bytes.
pub fn compute_hmac(
    hmac_key: &[u8],
    header_bytes: &[u8],
    accounts_bytes: &[u8],
) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(hmac_key)
        .map_err(|e| CandadoError::HmacError(format!("invalid HMAC key: {e}")))?;

    mac.update(header_bytes);
    mac.update(accounts_bytes);

    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify that the HMAC matches using constant-time comparison.
///
/// Uses `hmac::Mac::verify_slice` which is guaranteed constant-time,
/// preventing timing side-channel attacks.
pub fn verify_hmac(
    hmac_key: &[u8],
    header_bytes: &[u8],
    accounts_bytes: &[u8],
    expected_hmac: &[u8],
) -> Result<()> {
    let mut mac = Hmac::<Sha256>::new_from_slice(hmac_key)
        .map_err(|e| CandadoError::HmacError(format!("invalid HMAC key: {e}")))?;

    mac.update(header_bytes);
    mac.update(accounts_bytes);

    mac.verify_slice(expected_hmac)
        .map_err(|_| CandadoError::HmacMismatch)
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
