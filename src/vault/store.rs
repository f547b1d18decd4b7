//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` owns the decrypted working set for one session.  It
//! wraps the binary format layer and the crypto layer so the rest of
//! the application can work with simple method calls like
//! `store.add(AccountRecord::draft("GitHub"))`.
//!
//! Mutations only touch memory; `save` is the single persistence
//! point and is all-or-nothing: either the whole validated working
//! set replaces the file on disk, or nothing changes.

use std::path::{Path, PathBuf};

use chrono::Utc;
use zeroize::Zeroize;

use crate::crypto::encryption::{decrypt_text, encrypt_text};
use crate::crypto::kdf::{derive_session_key_with_params, generate_salt, Argon2Params};
use crate::crypto::keys::SessionKey;
use crate::errors::{CandadoError, Result};

use super::account::{AccountDto, AccountRecord, Violation, DUPLICATE_SUFFIX};
use super::format::{self, StoredAccount, StoredArgon2Params, VaultHeader, CURRENT_VERSION};

/// Outcome of an `import_merge` call.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// How many accounts were added to the working set.
    pub imported: usize,

    /// Accounts whose names collided and were renamed: (original, final).
    pub renamed: Vec<(String, String)>,
}

/// The main vault handle.  Create one with `VaultStore::create` or
/// `VaultStore::open`, then use its methods to manage accounts.
pub struct VaultStore {
    /// Path to the `.vault` file on disk.
    path: PathBuf,

    /// Header metadata (version, salt, Argon2 params, timestamp).
    header: VaultHeader,

    /// The decrypted working set, in insertion order.  A plain Vec
    /// rather than a map: duplicates are allowed to exist here and are
    /// rejected at save time, so the caller can collect several drafts
    /// and be told about every conflict at once.
    accounts: Vec<AccountRecord>,

    /// The derived session key (zeroized on drop).
    session_key: SessionKey,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new vault file at `path`.
    ///
    /// Generates a random salt, derives the session key from the
    /// master secret, and writes an empty vault to disk.
    ///
    /// Pass `None` for `argon2_params` to use sensible defaults.
    /// Pass `Some(settings.argon2_params())` to use config values.
    pub fn create(
        path: &Path,
        master_secret: &str,
        argon2_params: Option<&Argon2Params>,
    ) -> Result<Self> {
        if master_secret.is_empty() {
            return Err(CandadoError::EmptyMasterSecret);
        }
        if path.exists() {
            return Err(CandadoError::VaultAlreadyExists(path.to_path_buf()));
        }

        // 1. Generate a random salt and resolve the Argon2 params.
        let salt = generate_salt()?;
        let effective_params = argon2_params.copied().unwrap_or_default();

        // 2. Derive the session key.
        let mut key_bytes =
            derive_session_key_with_params(master_secret.as_bytes(), &salt, &effective_params)?;
        let session_key = SessionKey::new(key_bytes);
        key_bytes.zeroize();

        // 3. Build the header (store the params so open uses the same).
        let header = VaultHeader {
            version: CURRENT_VERSION,
            salt: salt.to_vec(),
            created_at: Utc::now(),
            argon2_params: StoredArgon2Params {
                memory_kib: effective_params.memory_kib,
                iterations: effective_params.iterations,
                parallelism: effective_params.parallelism,
            },
        };

        let mut store = Self {
            path: path.to_path_buf(),
            header,
            accounts: Vec::new(),
            session_key,
        };

        // 4. Persist the empty vault to disk.
        store.save()?;

        Ok(store)
    }

    /// Open an existing vault file, verifying its integrity, and
    /// eagerly decrypt every record into the working set.
    ///
    /// Derives the session key from the master secret + stored salt
    /// (using stored Argon2 params) and verifies the HMAC **over the
    /// original bytes from disk**.  A wrong master secret or a
    /// tampered file fails here, before any record is trusted.
    pub fn open(path: &Path, master_secret: &str) -> Result<Self> {
        if master_secret.is_empty() {
            return Err(CandadoError::EmptyMasterSecret);
        }

        // 1. Read the binary vault file (raw bytes preserved).
        let raw = format::read_vault(path)?;

        // 2. Derive the session key using the stored Argon2 params.
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

        // 3. Verify the HMAC over the *original raw bytes* from disk.
        //    This avoids the re-serialization round-trip bug where
        //    serde_json might produce different byte output.
        let mut hmac_key = session_key.hmac_key()?;
        format::verify_hmac(
            &hmac_key,
            &raw.header_bytes,
            &raw.accounts_bytes,
            &raw.stored_hmac,
        )?;
        hmac_key.zeroize();

        // 4. Decrypt every record into the working set.  The HMAC has
        //    already vouched for the ciphertext bytes, so a failure
        //    here means corruption; abort with the account name rather
        //    than returning partial data.
        let mut record_key = session_key.record_key()?;
        let mut accounts = Vec::with_capacity(raw.accounts.len());
        for stored in raw.accounts {
            let password = match decrypt_text(&record_key, &stored.encrypted_password) {
                Ok(plaintext) => plaintext,
                Err(_) => {
                    record_key.zeroize();
                    return Err(CandadoError::RecordDecryptionFailed(stored.name));
                }
            };

            accounts.push(AccountRecord::persisted(
                stored.name,
                stored.user_name,
                password,
                stored.memo,
                stored.created_at,
                stored.updated_at,
            ));
        }
        record_key.zeroize();

        Ok(Self {
            path: path.to_path_buf(),
            header: raw.header,
            accounts,
            session_key,
        })
    }

    // ------------------------------------------------------------------
    // Account operations
    // ------------------------------------------------------------------

    /// Insert a draft into the working set.
    ///
    /// No validation happens here; empty and duplicate names are
    /// reported by `validate`/`save` so the caller sees all problems
    /// at once.
    pub fn add(&mut self, draft: AccountRecord) {
        self.accounts.push(draft);
    }

    /// Look up an account by name (case-insensitive).
    pub fn account(&self, name: &str) -> Option<&AccountRecord> {
        self.accounts.iter().find(|a| a.matches_name(name))
    }

    /// All accounts sorted case-insensitively by name for display.
    pub fn accounts(&self) -> Vec<&AccountRecord> {
        let mut list: Vec<&AccountRecord> = self.accounts.iter().collect();
        list.sort_by_key(|a| a.normalized_name());
        list
    }

    /// Mutate an existing account through a closure, refreshing its
    /// `updated_at` timestamp.
    ///
    /// Fails with `AccountNotFound` when no account matches `name`;
    /// updating a missing record is an error, unlike `delete`.
    pub fn update<F>(&mut self, name: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut AccountRecord) -> Result<()>,
    {
        let record = self
            .accounts
            .iter_mut()
            .find(|a| a.matches_name(name))
            .ok_or_else(|| CandadoError::AccountNotFound(name.to_string()))?;

        apply(record)?;
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Remove an account from the working set.
    ///
    /// Silently no-ops when no account matches — a draft that was
    /// never saved is simply discarded.  Disk changes at the next
    /// `save`.  Returns `true` if a record was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.accounts.len();
        self.accounts.retain(|a| !a.matches_name(name));
        self.accounts.len() < before
    }

    /// Returns `true` if any account (draft or persisted) has this
    /// name, case-insensitively.
    pub fn name_taken(&self, name: &str) -> bool {
        self.account(name).is_some()
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Check the working set for violations: empty account names and
    /// case-insensitive duplicates.
    ///
    /// Returns structured results rather than erroring so the caller
    /// can present every problem at once.  The O(n²) duplicate scan is
    /// fine at personal-vault scale and keeps the report ordering
    /// deterministic.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for account in &self.accounts {
            if account.name().is_empty() {
                violations.push(Violation::EmptyAccountName);
            }
        }

        let mut reported: Vec<String> = Vec::new();
        for (i, account) in self.accounts.iter().enumerate() {
            let normalized = account.normalized_name();
            if normalized.is_empty() || reported.contains(&normalized) {
                continue;
            }
            let duplicated = self
                .accounts
                .iter()
                .skip(i + 1)
                .any(|other| other.normalized_name() == normalized);
            if duplicated {
                violations.push(Violation::DuplicateAccountName(account.name().to_string()));
                reported.push(normalized);
            }
        }

        violations
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Validate, encrypt, and write the whole working set to disk
    /// atomically, then mark every record persisted.
    ///
    /// Any validation violation fails the save before anything is
    /// written; the file and the working set are left exactly as they
    /// were, so the caller can fix the drafts and retry.
    pub fn save(&mut self) -> Result<()> {
        let violations = self.validate();
        if !violations.is_empty() {
            return Err(CandadoError::Validation(violations));
        }

        // Encrypt each password with the record key.
        let mut record_key = self.session_key.record_key()?;
        let mut stored_list = Vec::with_capacity(self.accounts.len());
        for account in &self.accounts {
            let encrypted_password = match encrypt_text(&record_key, &account.password) {
                Ok(ciphertext) => ciphertext,
                Err(e) => {
                    record_key.zeroize();
                    return Err(e);
                }
            };
            stored_list.push(StoredAccount {
                name: account.name().to_string(),
                user_name: account.user_name.clone(),
                encrypted_password,
                memo: account.memo.clone(),
                created_at: account.created_at,
                updated_at: account.updated_at,
            });
        }
        record_key.zeroize();

        // Sort for deterministic output.
        stored_list.sort_by_key(|a| a.name.to_lowercase());

        let mut hmac_key = self.session_key.hmac_key()?;
        let result = format::write_vault(&self.path, &self.header, &stored_list, &hmac_key);
        hmac_key.zeroize();
        result?;

        // Only after the file is safely on disk do names become fixed.
        for account in &mut self.accounts {
            account.mark_persisted();
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Import / export
    // ------------------------------------------------------------------

    /// Merge externally produced account DTOs into the working set.
    ///
    /// Each incoming password ciphertext is decrypted with the current
    /// session key, so the import file must come from a vault with the
    /// same master secret.  A name collision renames the incoming
    /// record by appending `" - duplicate"` (repeatedly until unique)
    /// instead of overwriting or rejecting, so no data is ever lost.
    /// Imported records enter as drafts; `save` persists them.
    pub fn import_merge(&mut self, incoming: Vec<AccountDto>) -> Result<ImportOutcome> {
        let mut record_key = self.session_key.record_key()?;
        let mut outcome = ImportOutcome {
            imported: 0,
            renamed: Vec::new(),
        };

        for dto in incoming {
            let password = match decrypt_text(&record_key, &dto.password) {
                Ok(plaintext) => plaintext,
                Err(e) => {
                    record_key.zeroize();
                    return Err(e);
                }
            };

            let mut final_name = dto.name.clone();
            while !final_name.is_empty() && self.name_taken(&final_name) {
                final_name.push_str(DUPLICATE_SUFFIX);
            }
            if final_name != dto.name {
                outcome.renamed.push((dto.name.clone(), final_name.clone()));
            }

            let now = Utc::now();
            let mut record = AccountRecord::draft(&final_name);
            record.user_name = dto.user_name;
            record.password = password;
            record.memo = dto.memo;
            record.created_at = now;
            record.updated_at = now;

            self.accounts.push(record);
            outcome.imported += 1;
        }

        record_key.zeroize();
        Ok(outcome)
    }

    /// Snapshot every account as a transfer DTO, passwords encrypted
    /// under the current session key, sorted by name.
    ///
    /// The counterpart of `import_merge`: an export is importable by
    /// any vault opened with the same master secret.
    pub fn export_all(&self) -> Result<Vec<AccountDto>> {
        let mut record_key = self.session_key.record_key()?;
        let mut dtos = Vec::with_capacity(self.accounts.len());

        for account in self.accounts() {
            let password = match encrypt_text(&record_key, &account.password) {
                Ok(ciphertext) => ciphertext,
                Err(e) => {
                    record_key.zeroize();
                    return Err(e);
                }
            };
            dtos.push(AccountDto {
                name: account.name().to_string(),
                user_name: account.user_name.clone(),
                password,
                memo: account.memo.clone(),
            });
        }

        record_key.zeroize();
        Ok(dtos)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of accounts in the working set.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Returns the vault creation timestamp.
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.header.created_at
    }
}
