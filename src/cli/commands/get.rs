//! `candado get` — print a single account's password.

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{CandadoError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let store = unlock(cli)?;

    let account = store
        .account(name)
        .ok_or_else(|| CandadoError::AccountNotFound(name.to_string()))?;

    if account.password.is_empty() {
        output::info(&format!(
            "No password stored for account '{}'",
            account.name()
        ));
    } else {
        println!("{}", account.password);
    }

    Ok(())
}
