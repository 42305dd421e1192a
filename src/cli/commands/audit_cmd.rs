//! `passvault audit` — display the audit log.
//!
//! Usage:
//!   passvault audit               # show last 50 entries
//!   passvault audit --last 20     # show last 20
//!   passvault audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Utc};

use crate::audit::AuditEntry;
use crate::cli::output;
use crate::cli::{open_unlocked, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let since_dt = since.map(parse_duration).transpose()?;

    let vault = open_unlocked(cli)?;
    let entries = vault.audit_log(last, since_dt)?;
    vault.close()?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m" into
/// the point in time that far in the past.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        ))
    };

    let (split, _) = input.char_indices().last().ok_or_else(invalid)?;
    let (num_str, unit) = input.split_at(split);
    let num: i64 = num_str.parse().map_err(|_| invalid())?;

    let duration = match unit {
        "d" => chrono::Duration::days(num),
        "h" => chrono::Duration::hours(num),
        "m" => chrono::Duration::minutes(num),
        _ => return Err(invalid()),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Entry", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let op = colorize_operation(&entry.action);
        let id = entry
            .resource_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let details = entry.details.as_deref().unwrap_or("-");

        table.add_row(vec![time, op, id, details.to_string()]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "create" | "unlock" => style(op).green().to_string(),
        "add" | "update" => style(op).blue().to_string(),
        "delete" | "unlock-failed" => style(op).red().to_string(),
        "export" | "import" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
