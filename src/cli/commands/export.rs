//! `candado export` — write all accounts to a JSON file or stdout.
//!
//! The export is a JSON array of account DTOs with passwords encrypted
//! under the current session key, so it is only importable by a vault
//! that knows the same master secret.

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{CandadoError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let store = unlock(cli)?;

    let dtos = store.export_all()?;
    let content = serde_json::to_string_pretty(&dtos)
        .map_err(|e| CandadoError::SerializationError(format!("JSON export: {e}")))?;

    // Write to file or stdout.
    match output_path {
        Some(dest) => {
            let dest_path = Path::new(dest);

            // Safety: refuse to overwrite vault files.
            if dest_path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("vault"))
            {
                return Err(CandadoError::CommandFailed(
                    "refusing to export over a .vault file".into(),
                ));
            }

            fs::write(dest_path, &content).map_err(|e| {
                CandadoError::CommandFailed(format!("failed to write export file: {e}"))
            })?;

            output::success(&format!("Exported {} account(s) to {}", dtos.len(), dest));
            output::tip("Passwords stay encrypted — import requires the same master secret.");
        }
        None => {
            // Write to stdout (no success message, just raw output).
            println!("{content}");
        }
    }

    Ok(())
}
