//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.
//!
//! Layout of the raw byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! Password fields travel as text, so `encrypt_text`/`decrypt_text`
//! wrap the byte layer in base64.  An empty password is stored as an
//! empty string and never routed through the cipher, so no fixed
//! ciphertext pattern exists for the most common value.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroize;

use crate::errors::{CandadoError, Result};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    // Build the cipher from the raw key bytes.
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CandadoError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // Generate a random 12-byte nonce.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // Encrypt and authenticate the plaintext.
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CandadoError::EncryptionFailed(format!("encryption error: {e}")))?;

    // Prepend the nonce so the caller only needs to store one blob.
    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Expects the first 12 bytes to be the nonce, followed by the ciphertext.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    // Make sure we have at least a nonce worth of bytes.
    if ciphertext_with_nonce.len() < NONCE_LEN {
        return Err(CandadoError::DecryptionFailed);
    }

    // Split nonce from ciphertext.
    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    // Build the cipher from the raw key bytes.
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CandadoError::DecryptionFailed)?;

    // Decrypt and verify the auth tag.
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CandadoError::DecryptionFailed)?;

    Ok(plaintext)
}

/// Encrypt a text value into a base64 string safe to store or export.
///
/// The empty string short-circuits to an empty ciphertext: a blank
/// password is stored as blank, not as the encryption of "".
pub fn encrypt_text(key: &[u8], plaintext: &str) -> Result<String> {
    if plaintext.is_empty() {
        return Ok(String::new());
    }

    let blob = encrypt(key, plaintext.as_bytes())?;
    Ok(BASE64.encode(blob))
}

/// Decrypt a base64 string produced by `encrypt_text`.
///
/// An empty ciphertext maps back to an empty plaintext.  A ciphertext
/// that is not valid base64, or that fails authentication, yields a
/// typed `DecryptionFailed` error rather than garbage or a panic.
pub fn decrypt_text(key: &[u8], ciphertext: &str) -> Result<String> {
    if ciphertext.is_empty() {
        return Ok(String::new());
    }

    let blob = BASE64
        .decode(ciphertext)
        .map_err(|_| CandadoError::DecryptionFailed)?;

    let plaintext_bytes = decrypt(key, &blob)?;

    // Convert to String via from_utf8 which takes ownership (no clone).
    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext_bytes).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        CandadoError::DecryptionFailed
    })
}
