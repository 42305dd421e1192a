//! `passvault delete` — remove an entry from the vault.

use crate::cli::output;
use crate::cli::{confirm, open_unlocked, Cli};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: i64, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete entry {id}?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut vault = open_unlocked(cli)?;
    vault.delete_password(id)?;
    vault.close()?;

    output::success(&format!("Deleted entry {id}"));

    Ok(())
}
