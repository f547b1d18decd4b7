//! `candado init` — create a new vault.

use std::fs;

use crate::cli::output;
use crate::cli::{prompt_new_master_secret, vault_path, Cli};
use crate::config::Settings;
use crate::errors::{CandadoError, Result};
use crate::vault::VaultStore;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;

    // Resolve the vault path the same way every other command does
    // (--vault-dir flag, then .candado.toml, then the default).
    let vault_path = vault_path(cli)?;
    let vault_dir = vault_path
        .parent()
        .unwrap_or(std::path::Path::new("."))
        .to_path_buf();

    // 1. Create the vault directory if it doesn't exist.
    if !vault_dir.exists() {
        fs::create_dir_all(&vault_dir)?;
        let dir_display = vault_dir.display();
        output::info(&format!("Created vault directory: {dir_display}"));
    }

    // 2. Check if a vault already exists.
    if vault_path.exists() {
        output::tip("Use `candado add` to add accounts to the existing vault.");
        return Err(CandadoError::VaultAlreadyExists(vault_path));
    }

    // 3. Prompt for a new master secret (with confirmation).  This is
    //    the first-run path: the secret chosen here becomes the
    //    vault's master secret for all future sessions.
    let secret = prompt_new_master_secret()?;

    // 4. Load settings and create the vault file.
    let settings = Settings::load(&cwd)?;
    VaultStore::create(&vault_path, &secret, Some(&settings.argon2_params()))?;

    output::success(&format!("Vault created at {}", vault_path.display()));

    // 5. Show helpful tips.
    output::tip("Run `candado add <NAME>` to add an account.");
    output::tip("Run `candado list` to see all accounts.");

    Ok(())
}
