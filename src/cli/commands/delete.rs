//! `candado delete` — remove an account from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{CandadoError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete account '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| CandadoError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let mut store = unlock(cli)?;

    // Delete is a silent no-op for unknown names, so report what
    // actually happened.
    if store.delete(name) {
        store.save()?;
        output::success(&format!("Deleted account '{name}'"));
    } else {
        output::info(&format!("No account named '{name}' — nothing to delete."));
    }

    Ok(())
}
