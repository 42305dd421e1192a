//! `passvault add` — store a new entry.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_unlocked, Cli, EntryFields};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::generator::generate_password;
use crate::vault::NewEntry;

/// Execute the `add` command.
pub fn execute(cli: &Cli, title: &str, fields: &EntryFields) -> Result<()> {
    let settings = Settings::load(&crate::cli::vault_dir(cli)?)?;
    let password = match entry_password(fields, &settings)? {
        Some(pw) => pw,
        None => read_password(title)?,
    };

    let entry = NewEntry {
        title: title.to_string(),
        url: fields.url.clone().unwrap_or_default(),
        username: fields.username.clone().unwrap_or_default(),
        password: password.to_string(),
        notes: fields.notes.clone().unwrap_or_default(),
        category: fields.category.clone().unwrap_or_default(),
    };

    let mut vault = open_unlocked(cli)?;
    let id = vault.add_password(&entry)?;
    vault.close()?;

    output::success(&format!("Added '{title}' with id {id}"));
    if fields.generate {
        output::tip("Run `passvault show <ID>` to see the generated password.");
    }

    Ok(())
}

/// Password from `--password` or `--generate`, if either was given.
pub(crate) fn entry_password(
    fields: &EntryFields,
    settings: &Settings,
) -> Result<Option<Zeroizing<String>>> {
    if let Some(pw) = &fields.password {
        output::warning("Password provided on command line — it may appear in shell history.");
        return Ok(Some(Zeroizing::new(pw.clone())));
    }
    if fields.generate {
        return generate_password(&settings.generator).map(Some);
    }
    Ok(None)
}

/// Read the entry password from piped stdin or an interactive prompt.
fn read_password(title: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = Zeroizing::new(buf.trim_end().to_string());
        if trimmed.is_empty() {
            return Err(VaultError::InvalidEntry("password must not be empty".into()));
        }
        return Ok(trimmed);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for {title}"))
        .with_confirmation("Confirm password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}
