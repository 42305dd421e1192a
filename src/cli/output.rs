//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{EntrySummary, PasswordEntry};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entry metadata.  Never includes passwords or notes.
pub fn print_entries_table(entries: &[EntrySummary]) {
    if entries.is_empty() {
        info("No entries found.");
        tip("Run `passvault add <TITLE>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Title", "Username", "URL", "Category", "Updated"]);

    for e in entries {
        table.add_row(vec![
            e.id.to_string(),
            e.title.clone(),
            dash_if_empty(&e.username),
            dash_if_empty(&e.url),
            dash_if_empty(&e.category),
            e.updated_at.format(TIME_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every field of a decrypted entry as a two-column table.
pub fn print_entry(entry: &PasswordEntry) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["ID".to_string(), entry.id.to_string()]);
    table.add_row(vec!["Title".to_string(), entry.title.clone()]);
    table.add_row(vec!["Username".to_string(), dash_if_empty(&entry.username)]);
    table.add_row(vec!["Password".to_string(), entry.password.clone()]);
    table.add_row(vec!["URL".to_string(), dash_if_empty(&entry.url)]);
    table.add_row(vec!["Category".to_string(), dash_if_empty(&entry.category)]);
    table.add_row(vec!["Notes".to_string(), dash_if_empty(&entry.notes)]);
    table.add_row(vec![
        "Created".to_string(),
        entry.created_at.format(TIME_FORMAT).to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        entry.updated_at.format(TIME_FORMAT).to_string(),
    ]);

    println!("{table}");
}

fn dash_if_empty(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
