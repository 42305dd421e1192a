//! `passvault show` — decrypt and print a single entry.

use crate::cli::output;
use crate::cli::{open_unlocked, Cli};
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: i64) -> Result<()> {
    let vault = open_unlocked(cli)?;
    let entry = vault.get_password(id)?;
    vault.close()?;

    output::print_entry(&entry);

    Ok(())
}
