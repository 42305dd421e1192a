//! `passvault edit` — change fields of an existing entry.
//!
//! Only the fields passed on the command line change; everything else,
//! including the password, is kept.

use crate::cli::commands::add::entry_password;
use crate::cli::output;
use crate::cli::{open_unlocked, vault_dir, Cli, EntryFields};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::NewEntry;

/// Execute the `edit` command.
pub fn execute(cli: &Cli, id: i64, title: Option<&str>, fields: &EntryFields) -> Result<()> {
    if title.is_none() && !has_changes(fields) {
        return Err(VaultError::CommandFailed(
            "nothing to change — pass --title, --url, --username, --category, --notes, --password or --generate".into(),
        ));
    }

    let settings = Settings::load(&vault_dir(cli)?)?;
    let new_password = entry_password(fields, &settings)?;

    let mut vault = open_unlocked(cli)?;
    let mut updated = vault.get_password(id)?.to_new_entry();
    apply_changes(&mut updated, title, fields);
    if let Some(pw) = new_password {
        updated.password = pw.to_string();
    }

    vault.update_password(id, &updated)?;
    vault.close()?;

    output::success(&format!("Updated entry {id} ('{}')", updated.title));

    Ok(())
}

fn has_changes(fields: &EntryFields) -> bool {
    fields.url.is_some()
        || fields.username.is_some()
        || fields.category.is_some()
        || fields.notes.is_some()
        || fields.password.is_some()
        || fields.generate
}

fn apply_changes(entry: &mut NewEntry, title: Option<&str>, fields: &EntryFields) {
    if let Some(title) = title {
        entry.title = title.to_string();
    }
    if let Some(url) = &fields.url {
        entry.url = url.clone();
    }
    if let Some(username) = &fields.username {
        entry.username = username.clone();
    }
    if let Some(category) = &fields.category {
        entry.category = category.clone();
    }
    if let Some(notes) = &fields.notes {
        entry.notes = notes.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_no_changes() {
        assert!(!has_changes(&EntryFields::default()));
    }

    #[test]
    fn apply_changes_only_touches_given_fields() {
        let mut entry = NewEntry {
            title: "GitHub".into(),
            url: "https://github.com".into(),
            username: "octo".into(),
            password: "old".into(),
            notes: "keep me".into(),
            category: "dev".into(),
        };
        let fields = EntryFields {
            username: Some("octocat".into()),
            notes: Some(String::new()),
            ..EntryFields::default()
        };

        apply_changes(&mut entry, None, &fields);

        assert_eq!(entry.title, "GitHub");
        assert_eq!(entry.username, "octocat");
        assert_eq!(entry.notes, "");
        assert_eq!(entry.password, "old");
        assert_eq!(entry.category, "dev");
    }
}
