//! `passvault status` — show vault location and lifecycle state.
//!
//! Does not ask for the master password.

use crate::cli::output;
use crate::cli::{open_vault, vault_dir, Cli};
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::VaultState;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = vault_dir(cli)?;
    let (vault, settings) = open_vault(cli)?;
    let state = vault.state();
    vault.close()?;

    output::info(&format!("Vault directory: {}", dir.display()));
    output::info(&format!(
        "Database:        {}",
        settings.database_path(&dir).display()
    ));

    let config_path = dir.join(Settings::FILE_NAME);
    if config_path.exists() {
        output::info(&format!("Config file:     {}", config_path.display()));
    } else {
        output::info("Config file:     (defaults)");
    }

    match state {
        VaultState::Uninitialized => {
            output::warning("Vault is not initialized.");
            output::tip("Run `passvault init` to create it.");
        }
        other => output::success(&format!("Vault is initialized ({other}).")),
    }

    Ok(())
}
