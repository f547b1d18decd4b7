//! `candado add` — add a new account to the vault.

use std::io::{self, IsTerminal, Read};

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::Result;
use crate::vault::AccountRecord;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    user: Option<&str>,
    memo: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    // Determine the account password from one of three sources.
    let password_value = if let Some(p) = password {
        // Source 1: Inline value on the command line.
        output::warning("Password provided on command line — it may appear in shell history.");
        p.to_string()
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        // Source 3: Interactive secure prompt (default).  Empty input
        // is allowed — an account may have no stored password.
        dialoguer::Password::new()
            .with_prompt(format!("Enter password for {name} (empty for none)"))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| {
                crate::errors::CandadoError::CommandFailed(format!("input prompt: {e}"))
            })?
    };

    // Unlock the vault, add the draft, and save.  A duplicate or empty
    // name fails validation at save time and nothing is persisted.
    let mut store = unlock(cli)?;

    let mut draft = AccountRecord::draft(name);
    draft.user_name = user.unwrap_or_default().to_string();
    draft.memo = memo.unwrap_or_default().to_string();
    draft.password = password_value;

    store.add(draft);
    store.save()?;

    output::success(&format!(
        "Account '{}' added ({} total)",
        name,
        store.account_count()
    ));

    Ok(())
}
