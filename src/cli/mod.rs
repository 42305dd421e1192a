//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{SortField, Vault, VaultState};

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(name = "passvault", about = "Local encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: ~/.passvault)
    #[arg(long, env = "PASSVAULT_DIR", global = true)]
    pub vault_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault and set its master password
    Init,

    /// Show where the vault lives and whether it is initialized
    Status,

    /// Add a new entry
    Add {
        /// Entry title (e.g. "GitHub")
        title: String,
        #[command(flatten)]
        fields: EntryFields,
    },

    /// List entries (passwords are never shown)
    List {
        /// Substring to match against title, URL and username
        #[arg(short, long)]
        search: Option<String>,
        /// Only show entries in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Column to sort by
        #[arg(long, value_enum, default_value_t = SortField::Title)]
        sort: SortField,
        /// Sort in descending order
        #[arg(long)]
        desc: bool,
        /// Maximum number of entries to show (0 = all)
        #[arg(long, default_value = "0")]
        limit: usize,
        /// Number of entries to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Show a single entry, including its password and notes
    Show {
        /// Entry id (see `passvault list`)
        id: i64,
    },

    /// Change fields of an existing entry
    Edit {
        /// Entry id
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: EntryFields,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        #[command(flatten)]
        options: GenerateArgs,
    },

    /// Export all entries to an encrypted file
    Export {
        /// Destination file
        file: PathBuf,
        /// Overwrite the file if it already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Import entries from an encrypted export file
    Import {
        /// Export file to read
        file: PathBuf,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Entry fields shared by `add` and `edit`.
#[derive(clap::Args, Debug, Default)]
pub struct EntryFields {
    /// Website or application URL
    #[arg(long)]
    pub url: Option<String>,
    /// Login name
    #[arg(short, long)]
    pub username: Option<String>,
    /// Category used for filtering (e.g. "work")
    #[arg(short, long)]
    pub category: Option<String>,
    /// Free-form notes, stored encrypted
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Password value (omit for interactive prompt or piped stdin)
    #[arg(short, long, conflicts_with = "generate")]
    pub password: Option<String>,
    /// Generate a random password using the configured generator defaults
    #[arg(short, long)]
    pub generate: bool,
}

/// Overrides for the configured generator defaults.
#[derive(clap::Args, Debug, Default)]
pub struct GenerateArgs {
    /// Password length
    #[arg(short, long)]
    pub length: Option<usize>,
    /// Leave out lowercase letters
    #[arg(long)]
    pub no_lowercase: bool,
    /// Leave out uppercase letters
    #[arg(long)]
    pub no_uppercase: bool,
    /// Leave out digits
    #[arg(long)]
    pub no_numbers: bool,
    /// Leave out symbols
    #[arg(long)]
    pub no_symbols: bool,
    /// Allow look-alike characters such as l, 1, O and 0
    #[arg(long)]
    pub allow_similar: bool,
    /// Leave out brackets, quotes and other hard-to-type symbols
    #[arg(long)]
    pub exclude_ambiguous: bool,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the vault directory: `--vault-dir`, `PASSVAULT_DIR`, then
/// `~/.passvault`.
pub fn vault_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.vault_dir {
        return Ok(dir.clone());
    }
    dirs::home_dir()
        .map(|home| home.join(".passvault"))
        .ok_or_else(|| {
            VaultError::Config("cannot determine home directory; pass --vault-dir".into())
        })
}

/// Create the vault directory with owner-only permissions if missing.
pub fn ensure_vault_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

/// Load settings and open the vault database without unlocking it.
pub fn open_vault(cli: &Cli) -> Result<(Vault, Settings)> {
    let dir = vault_dir(cli)?;
    let settings = Settings::load(&dir)?;
    ensure_vault_dir(&dir)?;
    let vault = Vault::open(&settings.database_path(&dir))?;
    Ok((vault, settings))
}

/// Open the vault and unlock it with the master password.
///
/// An uninitialized vault is reported before any password is asked for.
pub fn open_unlocked(cli: &Cli) -> Result<Vault> {
    let (mut vault, _) = open_vault(cli)?;
    if vault.state() == VaultState::Uninitialized {
        return Err(VaultError::NotInitialized);
    }

    let password = prompt_password()?;
    vault.unlock(&password)?;
    Ok(vault)
}

/// Get the master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `init`).
///
/// Also respects `PASSVAULT_PASSWORD` for scripted use.
/// Enforces the configured minimum length.
pub fn prompt_new_password(min_len: usize) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        if pw.chars().count() < min_len {
            return Err(VaultError::CommandFailed(format!(
                "master password must be at least {min_len} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if password.chars().count() < min_len {
            output::warning(&format!(
                "Password must be at least {min_len} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}
