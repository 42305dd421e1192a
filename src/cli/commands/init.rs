//! `passvault init` — create a new vault and set its master password.

use crate::cli::output;
use crate::cli::{open_vault, prompt_new_password, vault_dir, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::VaultState;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = vault_dir(cli)?;
    let (mut vault, settings) = open_vault(cli)?;
    let db_path = settings.database_path(&dir);

    // 1. Refuse to touch an existing vault; its salt is immutable.
    if vault.state() != VaultState::Uninitialized {
        output::tip("Use `passvault add <TITLE>` to add entries to the existing vault.");
        return Err(VaultError::AlreadyInitialized);
    }

    // 2. Prompt for a new master password (with confirmation).
    let password = prompt_new_password(settings.min_password_length)?;

    // 3. Derive the key, write salt and test vector.
    vault.create_master_password(&password)?;
    vault.close()?;

    output::success(&format!("Vault created at {}", db_path.display()));
    output::warning("There is no way to recover a forgotten master password.");
    output::tip("Run `passvault add <TITLE>` to add an entry.");
    output::tip("Run `passvault generate` to create a strong password.");

    Ok(())
}
