use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::generator::GeneratorOptions;

/// Vault-level configuration, loaded from `<vault_dir>/config.toml`.
///
/// Every field has a default so PassVault works without any config
/// file at all.  Key derivation parameters are fixed and deliberately
/// absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Database file name, relative to the vault directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Shortest master password accepted by `init`.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Defaults for `passvault generate` and `add --generate`.
    #[serde(default)]
    pub generator: GeneratorOptions,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_database_file() -> String {
    "vault.db".to_string()
}

fn default_min_password_length() -> usize {
    8
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            min_password_length: default_min_password_length(),
            generator: GeneratorOptions::default(),
        }
    }
}

impl Settings {
    /// Name of the config file inside the vault directory.
    pub const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<vault_dir>/config.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(vault_dir: &Path) -> Result<Self> {
        let config_path = vault_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path to the vault database.
    ///
    /// Example: `~/.passvault/vault.db`
    pub fn database_path(&self, vault_dir: &Path) -> PathBuf {
        vault_dir.join(&self.database_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.database_file, "vault.db");
        assert_eq!(s.min_password_length, 8);
        assert_eq!(s.generator, GeneratorOptions::default());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.database_file, "vault.db");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
database_file = "personal.db"
min_password_length = 12

[generator]
length = 24
symbols = false
exclude_ambiguous = true
"#;
        fs::write(tmp.path().join("config.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.database_file, "personal.db");
        assert_eq!(settings.min_password_length, 12);
        assert_eq!(settings.generator.length, 24);
        assert!(!settings.generator.symbols);
        assert!(settings.generator.exclude_ambiguous);
        // Unset generator fields keep their defaults.
        assert!(settings.generator.lowercase);
        assert!(settings.generator.exclude_similar);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "min_password_length = 10\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.min_password_length, 10);
        assert_eq!(settings.database_file, "vault.db");
        assert_eq!(settings.generator.length, 16);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(VaultError::Config(_))));
    }

    #[test]
    fn database_path_joins_vault_dir() {
        let s = Settings {
            database_file: "work.db".to_string(),
            ..Settings::default()
        };
        let path = s.database_path(Path::new("/home/user/.passvault"));
        assert_eq!(path, PathBuf::from("/home/user/.passvault/work.db"));
    }
}
