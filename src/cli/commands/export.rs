//! `passvault export` — write every entry to an encrypted file.
//!
//! The file can only be imported by a vault unlocked with the same
//! master password (same key and salt).

use std::path::Path;

use crate::cli::output;
use crate::cli::{open_unlocked, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `export` command.
pub fn execute(cli: &Cli, file: &Path, force: bool) -> Result<()> {
    if file.exists() && !force {
        output::tip("Pass --force to overwrite it.");
        return Err(VaultError::ExportExists(file.to_path_buf()));
    }

    let vault = open_unlocked(cli)?;
    let count = vault.export_vault(file)?;
    vault.close()?;

    output::success(&format!("Exported {count} entries to {}", file.display()));
    output::tip("The export opens only with this vault's master password.");

    Ok(())
}
