//! `candado edit` — update fields of an existing account.
//!
//! The account name itself is immutable once saved; renaming means
//! delete + recreate.

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{CandadoError, Result};

/// Execute the `edit` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    user: Option<&str>,
    memo: Option<&str>,
    change_password: bool,
) -> Result<()> {
    if user.is_none() && memo.is_none() && !change_password {
        output::tip("Nothing to change — pass --user, --memo, or --password.");
        return Ok(());
    }

    // Collect the new password before unlocking so a cancelled prompt
    // leaves the vault untouched.
    let new_password = if change_password {
        Some(
            dialoguer::Password::new()
                .with_prompt(format!("Enter new password for {name} (empty for none)"))
                .allow_empty_password(true)
                .interact()
                .map_err(|e| CandadoError::CommandFailed(format!("input prompt: {e}")))?,
        )
    } else {
        None
    };

    let mut store = unlock(cli)?;

    store.update(name, |account| {
        if let Some(u) = user {
            account.user_name = u.to_string();
        }
        if let Some(m) = memo {
            account.memo = m.to_string();
        }
        if let Some(p) = new_password {
            account.password = p;
        }
        Ok(())
    })?;

    store.save()?;

    output::success(&format!("Account '{name}' updated"));

    Ok(())
}
