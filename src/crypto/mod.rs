//! Cryptographic primitives for Candado.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id master-secret key derivation (`kdf`)
//! - HKDF-based record key and HMAC key derivation (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt_text, decrypt_text, derive_session_key, ...};
pub use encryption::{decrypt, decrypt_text, encrypt, encrypt_text};
pub use kdf::{derive_session_key, derive_session_key_with_params, generate_salt, Argon2Params};
pub use keys::{derive_hmac_key, derive_record_key, SessionKey};
