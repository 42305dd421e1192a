//! `passvault import` — add the entries of an encrypted export file.
//!
//! Import is additive: every entry in the file becomes a new entry and
//! existing ones are untouched.  Either the whole file is imported or
//! nothing is.

use std::path::Path;

use crate::cli::output;
use crate::cli::{confirm, open_unlocked, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `import` command.
pub fn execute(cli: &Cli, file: &Path, yes: bool) -> Result<()> {
    if !file.exists() {
        return Err(VaultError::CommandFailed(format!(
            "import file not found: {}",
            file.display()
        )));
    }

    if !yes && !confirm(&format!("Import all entries from {}?", file.display()))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut vault = open_unlocked(cli)?;
    let count = vault.import_vault(file)?;
    vault.close()?;

    if count == 0 {
        output::warning("The export file contained no entries.");
    } else {
        output::success(&format!("Imported {count} entries from {}", file.display()));
    }

    Ok(())
}
