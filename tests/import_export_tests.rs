//! Integration tests for vault import/export and the merge policy.

use candado::crypto::Argon2Params;
use candado::vault::{AccountRecord, VaultStore};
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

fn draft(name: &str, user: &str, password: &str) -> AccountRecord {
    let mut record = AccountRecord::draft(name);
    record.user_name = user.to_string();
    record.password = password.to_string();
    record
}

// ---------------------------------------------------------------------------
// Export / import round-trip
// ---------------------------------------------------------------------------

#[test]
fn export_then_import_into_fresh_vault_roundtrips() {
    let (_dir, path) = vault_path();
    let mut store = VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();
    store.add(draft("GitHub", "alice", "s3cr3t"));
    store.add(draft("Email", "alice@example.com", "mailpw"));
    store.save().unwrap();

    let snapshot = store.export_all().unwrap();
    assert_eq!(snapshot.len(), 2);

    // Export is sorted by name and keeps passwords as ciphertext.
    assert_eq!(snapshot[0].name, "Email");
    assert_eq!(snapshot[1].name, "GitHub");
    assert_ne!(snapshot[1].password, "s3cr3t");

    // A second vault under the same master secret can absorb the export.
    let (_dir2, path2) = vault_path();
    let mut store2 = VaultStore::create(&path2, "hunter2", Some(&fast_params())).unwrap();
    let outcome = store2.import_merge(snapshot).unwrap();
    store2.save().unwrap();

    assert_eq!(outcome.imported, 2);
    assert!(outcome.renamed.is_empty());
    assert_eq!(store2.account("GitHub").unwrap().password, "s3cr3t");
    assert_eq!(store2.account("Email").unwrap().password, "mailpw");
}

#[test]
fn export_under_different_secret_is_not_importable() {
    let (_dir, path) = vault_path();
    let mut store = VaultStore::create(&path, "alpha", Some(&fast_params())).unwrap();
    store.add(draft("Bank", "carol", "pin"));
    store.save().unwrap();
    let snapshot = store.export_all().unwrap();

    let (_dir2, path2) = vault_path();
    let mut other = VaultStore::create(&path2, "beta", Some(&fast_params())).unwrap();

    // The ciphertext was produced under "alpha"'s session key.
    assert!(other.import_merge(snapshot).is_err());
}

// ---------------------------------------------------------------------------
// Collision renaming
// ---------------------------------------------------------------------------

#[test]
fn import_collision_renames_with_duplicate_suffix() {
    let (_dir, path) = vault_path();
    let mut store = VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();
    store.add(draft("Email", "old@example.com", "oldpw"));
    store.save().unwrap();

    let snapshot = store.export_all().unwrap();
    let outcome = store.import_merge(snapshot).unwrap();
    store.save().unwrap();

    // Two records now: the original and the renamed import; no data loss.
    assert_eq!(outcome.imported, 1);
    assert_eq!(
        outcome.renamed,
        vec![("Email".to_string(), "Email - duplicate".to_string())]
    );
    assert_eq!(store.account_count(), 2);
    assert_eq!(store.account("Email").unwrap().password, "oldpw");
    assert_eq!(store.account("Email - duplicate").unwrap().password, "oldpw");
}

#[test]
fn repeated_import_stacks_duplicate_suffixes() {
    let (_dir, path) = vault_path();
    let mut store = VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();
    store.add(draft("Work", "w", "pw"));
    store.save().unwrap();

    let snapshot = store.export_all().unwrap();
    store.import_merge(snapshot.clone()).unwrap();
    store.import_merge(snapshot).unwrap();
    store.save().unwrap();

    assert_eq!(store.account_count(), 3);
    assert!(store.account("Work").is_some());
    assert!(store.account("Work - duplicate").is_some());
    assert!(store.account("Work - duplicate - duplicate").is_some());
}

#[test]
fn import_collision_detection_is_case_insensitive() {
    let (_dir, path) = vault_path();
    let mut store = VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();
    store.add(draft("Email", "a", "pw"));
    store.save().unwrap();

    let mut snapshot = store.export_all().unwrap();
    snapshot[0].name = "EMAIL".to_string();

    let outcome = store.import_merge(snapshot).unwrap();
    assert_eq!(
        outcome.renamed,
        vec![("EMAIL".to_string(), "EMAIL - duplicate".to_string())]
    );
}

#[test]
fn colliding_names_within_one_import_batch_are_renamed() {
    let (_dir, path) = vault_path();
    let mut source = VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();
    source.add(draft("Site", "a", "pw-a"));
    source.save().unwrap();
    let one = source.export_all().unwrap().remove(0);

    let (_dir2, path2) = vault_path();
    let mut store = VaultStore::create(&path2, "hunter2", Some(&fast_params())).unwrap();

    // Same DTO twice in one batch: the second must be renamed too.
    let outcome = store.import_merge(vec![one.clone(), one]).unwrap();
    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.renamed.len(), 1);
    assert!(store.account("Site").is_some());
    assert!(store.account("Site - duplicate").is_some());
}

#[test]
fn imported_records_are_drafts_until_saved() {
    let (_dir, path) = vault_path();
    let mut store = VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();
    store.add(draft("Home", "h", "pw"));
    store.save().unwrap();

    let snapshot = store.export_all().unwrap();
    store.import_merge(snapshot).unwrap();

    let imported = store.account("Home - duplicate").unwrap();
    assert!(!imported.is_persisted());

    store.save().unwrap();
    assert!(store.account("Home - duplicate").unwrap().is_persisted());
}

#[test]
fn empty_passwords_survive_export_import() {
    let (_dir, path) = vault_path();
    let mut store = VaultStore::create(&path, "hunter2", Some(&fast_params())).unwrap();
    store.add(draft("NoPw", "user", ""));
    store.save().unwrap();

    let snapshot = store.export_all().unwrap();
    assert_eq!(snapshot[0].password, "", "blank stays blank in the export");

    let (_dir2, path2) = vault_path();
    let mut store2 = VaultStore::create(&path2, "hunter2", Some(&fast_params())).unwrap();
    store2.import_merge(snapshot).unwrap();
    assert_eq!(store2.account("NoPw").unwrap().password, "");
}
