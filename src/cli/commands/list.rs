//! `passvault list` — display entries in a table.

use crate::cli::output;
use crate::cli::{open_unlocked, Cli};
use crate::errors::Result;
use crate::vault::SearchParams;

/// Execute the `list` command.
pub fn execute(cli: &Cli, params: &SearchParams) -> Result<()> {
    let vault = open_unlocked(cli)?;
    let entries = vault.search_passwords(params)?;
    vault.close()?;

    output::info(&format!("{} entries", entries.len()));
    output::print_entries_table(&entries);

    Ok(())
}
