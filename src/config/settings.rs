use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{PassVaultError, Result};
use crate::generator::{CharacterClasses, DEFAULT_LENGTH};

/// User configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Vault file path, relative to the directory the config lives in.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Length of generated secrets (default: 16).
    #[serde(default = "default_generator_length")]
    pub generator_length: usize,

    #[serde(default = "default_true")]
    pub generator_lowercase: bool,

    #[serde(default = "default_true")]
    pub generator_uppercase: bool,

    #[serde(default = "default_true")]
    pub generator_digits: bool,

    #[serde(default = "default_true")]
    pub generator_symbols: bool,

    /// Copy generated secrets to the clipboard instead of printing them.
    #[serde(default = "default_true")]
    pub copy_to_clipboard: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "passwords.vault".to_string()
}

fn default_generator_length() -> usize {
    DEFAULT_LENGTH
}

fn default_true() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            generator_length: default_generator_length(),
            generator_lowercase: true,
            generator_uppercase: true,
            generator_digits: true,
            generator_symbols: true,
            copy_to_clipboard: true,
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        toml::from_str(&contents).map_err(|e| {
            PassVaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `dir/passwords.vault`
    pub fn vault_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.vault_file)
    }

    /// Convert the generator flags into core character classes.
    pub fn character_classes(&self) -> CharacterClasses {
        CharacterClasses {
            lowercase: self.generator_lowercase,
            uppercase: self.generator_uppercase,
            digits: self.generator_digits,
            symbols: self.generator_symbols,
        }
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
        assert_eq!(s.vault_file, "passwords.vault");
        assert_eq!(s.generator_length, 16);
        assert_eq!(s.character_classes(), CharacterClasses::default());
        assert!(s.copy_to_clipboard);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_file, "passwords.vault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_file = "secrets/personal.vault"
generator_length = 24
generator_symbols = false
copy_to_clipboard = false
"#;
        fs::write(tmp.path().join(".passvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_file, "secrets/personal.vault");
        assert_eq!(settings.generator_length, 24);
        assert!(!settings.copy_to_clipboard);
        let classes = settings.character_classes();
        assert!(classes.lowercase && classes.uppercase && classes.digits);
        assert!(!classes.symbols);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".passvault.toml"), "not valid {{toml").unwrap();
        assert!(matches!(
            Settings::load(tmp.path()),
            Err(PassVaultError::Config(_))
        ));
    }

    #[test]
    fn load_errors_on_unknown_key() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".passvault.toml"), "vault_dir = \"x\"\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn vault_path_joins_dir() {
        let s = Settings::default();
        assert_eq!(
            s.vault_path(Path::new("/home/user")),
            PathBuf::from("/home/user/passwords.vault")
        );
    }
}
