//! `candado list` — display all accounts in a table.

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = unlock(cli)?;

    let accounts = store.accounts();

    output::info(&format!("{} account(s)", accounts.len()));
    output::print_accounts_table(&accounts);

    Ok(())
}
