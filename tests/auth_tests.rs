//! Integration tests for the master-secret authentication gate.

use candado::auth::{AuthOutcome, Authenticator};
use candado::crypto::Argon2Params;
use candado::errors::CandadoError;
use candado::vault::VaultStore;
use tempfile::TempDir;

fn vault_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("accounts.vault");
    (dir, path)
}

fn fast_params() -> Argon2Params {
    Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

#[test]
fn blank_secret_is_rejected_before_touching_storage() {
    let (_dir, path) = vault_path();
    let auth = Authenticator::new(&path);

    assert!(matches!(
        auth.authenticate(""),
        Err(CandadoError::EmptyMasterSecret)
    ));
    assert!(matches!(
        auth.authenticate("   "),
        Err(CandadoError::EmptyMasterSecret)
    ));
}

#[test]
fn missing_vault_means_first_run() {
    let (_dir, path) = vault_path();
    let auth = Authenticator::new(&path);

    assert_eq!(auth.authenticate("any-secret").unwrap(), AuthOutcome::FirstRun);
}

#[test]
fn correct_secret_unlocks() {
    let (_dir, path) = vault_path();
    VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();

    let auth = Authenticator::new(&path);
    assert_eq!(auth.authenticate("hunter2").unwrap(), AuthOutcome::Unlocked);
}

#[test]
fn wrong_secret_is_rejected_not_errored() {
    let (_dir, path) = vault_path();
    VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();

    let auth = Authenticator::new(&path);
    assert_eq!(auth.authenticate("hunter3").unwrap(), AuthOutcome::Rejected);
}

#[test]
fn unlocked_guarantees_open_succeeds() {
    let (_dir, path) = vault_path();
    {
        let mut store = VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();
        let mut record = candado::vault::AccountRecord::draft("GitHub");
        record.password = "s3cr3t".to_string();
        store.add(record);
        store.save().unwrap();
    }

    let auth = Authenticator::new(&path);
    assert_eq!(auth.authenticate("hunter2").unwrap(), AuthOutcome::Unlocked);

    // The authenticator runs the same derivation path as open, so an
    // unlocked vault always decrypts.
    let store = VaultStore::open(&path, "hunter2").unwrap();
    assert_eq!(store.account("GitHub").unwrap().password, "s3cr3t");
}

#[test]
fn corrupted_vault_file_surfaces_an_error() {
    let (_dir, path) = vault_path();
    VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();

    // Destroy the envelope entirely (bad magic) rather than the HMAC.
    std::fs::write(&path, b"garbage").unwrap();

    let auth = Authenticator::new(&path);
    assert!(auth.authenticate("hunter2").is_err());
}
