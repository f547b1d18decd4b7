//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use clap::Parser;

use zeroize::Zeroizing;

use crate::auth::{AuthOutcome, Authenticator};
use crate::config::Settings;
use crate::errors::{CandadoError, Result};
use crate::vault::VaultStore;

/// Minimum master-secret length to prevent trivially weak secrets.
const MIN_SECRET_LEN: usize = 8;

/// Candado CLI: encrypted credential vault.
#[derive(Parser)]
#[command(name = "candado", about = "Encrypted credential vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (overrides `vault_dir` from .candado.toml;
    /// default: .candado)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault
    Init,

    /// Add an account to the vault
    Add {
        /// Account name (e.g. "GitHub")
        name: String,

        /// Username for the account
        #[arg(short, long)]
        user: Option<String>,

        /// Free-text memo
        #[arg(short, long)]
        memo: Option<String>,

        /// Password value (omit for interactive prompt)
        #[arg(long)]
        password: Option<String>,
    },

    /// Print an account's password
    Get {
        /// Account name
        name: String,
    },

    /// List all accounts
    List,

    /// Edit an existing account (the name itself cannot change)
    Edit {
        /// Account name
        name: String,

        /// New username
        #[arg(short, long)]
        user: Option<String>,

        /// New memo
        #[arg(short, long)]
        memo: Option<String>,

        /// Prompt for a new password
        #[arg(short, long)]
        password: bool,
    },

    /// Delete an account
    Delete {
        /// Account name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Export all accounts to a JSON file or stdout
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import accounts from a JSON export file
    Import {
        /// Path to the file to import
        file: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master secret, trying in order:
/// 1. `CANDADO_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the secret is wiped from memory on drop.
pub fn prompt_master_secret() -> Result<Zeroizing<String>> {
    // 1. Check the environment variable first (script friendly).
    if let Ok(secret) = std::env::var("CANDADO_PASSWORD") {
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret));
        }
    }

    // 2. Fall back to interactive prompt.
    let secret = dialoguer::Password::new()
        .with_prompt("Enter master secret")
        .interact()
        .map_err(|e| CandadoError::CommandFailed(format!("secret prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Prompt for a new master secret with confirmation (used during `init`).
///
/// Also respects `CANDADO_PASSWORD` for scripted usage.
/// Enforces a minimum secret length.
///
/// Returns `Zeroizing<String>` so the secret is wiped from memory on drop.
pub fn prompt_new_master_secret() -> Result<Zeroizing<String>> {
    // Check the environment variable first (script friendly).
    if let Ok(secret) = std::env::var("CANDADO_PASSWORD") {
        if !secret.is_empty() {
            if secret.len() < MIN_SECRET_LEN {
                return Err(CandadoError::CommandFailed(format!(
                    "master secret must be at least {MIN_SECRET_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(secret));
        }
    }

    loop {
        let secret = dialoguer::Password::new()
            .with_prompt("Choose master secret")
            .with_confirmation("Confirm master secret", "Secrets do not match, try again")
            .interact()
            .map_err(|e| CandadoError::CommandFailed(format!("secret prompt: {e}")))?;

        if secret.len() < MIN_SECRET_LEN {
            output::warning(&format!(
                "Master secret must be at least {MIN_SECRET_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(secret));
    }
}

/// Build the full path to the vault file.
///
/// The `--vault-dir` flag wins when given; otherwise the `vault_dir`
/// from `.candado.toml` (or its default) decides.
///
/// Example: `<cwd>/.candado/accounts.vault`
pub fn vault_path(cli: &Cli) -> Result<std::path::PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.vault_dir {
        Some(dir) => Ok(cwd.join(dir).join(crate::config::settings::VAULT_FILE_NAME)),
        None => Ok(Settings::load(&cwd)?.vault_path(&cwd)),
    }
}

/// Authenticate the master secret and open the vault.
///
/// Every vault-touching command goes through here: the Authenticator
/// decides whether the secret unlocks the vault before the store is
/// opened, so a wrong secret is reported as exactly that.
pub fn unlock(cli: &Cli) -> Result<VaultStore> {
    let path = vault_path(cli)?;
    let secret = prompt_master_secret()?;

    match Authenticator::new(&path).authenticate(&secret)? {
        AuthOutcome::Unlocked => VaultStore::open(&path, &secret),
        AuthOutcome::Rejected => Err(CandadoError::CommandFailed(
            "master secret is invalid".into(),
        )),
        AuthOutcome::FirstRun => {
            output::tip("Run `candado init` to create the vault first.");
            Err(CandadoError::VaultNotFound(path))
        }
    }
}
