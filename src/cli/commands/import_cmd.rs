//! `candado import` — merge accounts from a JSON export file.
//!
//! Name collisions never overwrite: the incoming account is renamed
//! with a " - duplicate" suffix and both records are kept.

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{CandadoError, Result};
use crate::vault::AccountDto;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file_path: &str) -> Result<()> {
    let source = Path::new(file_path);

    if !source.exists() {
        return Err(CandadoError::CommandFailed(format!(
            "import file not found: {}",
            source.display()
        )));
    }

    let dtos = parse_import_file(source)?;

    if dtos.is_empty() {
        output::warning("No accounts found in the import file.");
        return Ok(());
    }

    let mut store = unlock(cli)?;

    let merge = store.import_merge(dtos)?;
    store.save()?;

    for (original, renamed) in &merge.renamed {
        output::info(&format!("  '{original}' already exists — imported as '{renamed}'"));
    }

    output::success(&format!(
        "Imported {} account(s) from {}",
        merge.imported,
        source.display()
    ));

    Ok(())
}

/// Parse a JSON export file into account DTOs.
fn parse_import_file(path: &Path) -> Result<Vec<AccountDto>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CandadoError::CommandFailed(format!("failed to read file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| CandadoError::CommandFailed(format!("invalid import JSON: {e}")))
}
