//! CLI module — Clap argument parser, output helpers, and command implementations.
//!
//! The CLI is a thin shell over `VaultSession`: every command unlocks the
//! vault, performs one operation, saves if something changed, and locks.

pub mod clipboard;
pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::vault::VaultSession;

/// Minimum length for a newly chosen master passphrase.
const MIN_PASSWORD_LEN: usize = 8;

/// PassVault CLI: encrypted local password vault.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Encrypted local password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file to use (default: from .passvault.toml, else ./passwords.vault)
    #[arg(long, global = true, env = "PASSVAULT_VAULT")]
    pub vault: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Save a new entry (secret read from prompt or stdin)
    Add {
        /// Service name (e.g. github)
        service: String,
        /// Username for the service
        #[arg(short, long, default_value = "")]
        username: String,
        /// Email address for the service
        #[arg(short, long, default_value = "")]
        email: String,
    },

    /// Show one entry
    Get {
        /// Service name
        service: String,
        /// Print the secret in plain text
        #[arg(long)]
        show: bool,
        /// Copy the secret to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// List all entries (secrets are never shown)
    List,

    /// Update fields of an existing entry (omitted fields are kept)
    Update {
        /// Service name
        service: String,
        /// New username
        #[arg(short, long)]
        username: Option<String>,
        /// New email address
        #[arg(short, long)]
        email: Option<String>,
        /// Prompt for a new secret
        #[arg(short, long)]
        secret: bool,
    },

    /// Delete an entry
    Delete {
        /// Service name
        service: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random secret and save it as a new entry
    Generate {
        /// Service name
        service: String,
        /// Username for the service
        #[arg(short, long, default_value = "")]
        username: String,
        /// Email address for the service
        #[arg(short, long, default_value = "")]
        email: String,
        /// Secret length (default: from config, else 16)
        #[arg(short, long)]
        length: Option<usize>,
        /// Exclude lowercase letters
        #[arg(long)]
        no_lowercase: bool,
        /// Exclude uppercase letters
        #[arg(long)]
        no_uppercase: bool,
        /// Exclude digits
        #[arg(long)]
        no_digits: bool,
        /// Exclude punctuation
        #[arg(long)]
        no_symbols: bool,
        /// Print the secret instead of copying it to the clipboard
        #[arg(long)]
        no_copy: bool,
    },

    /// Report secrets shared by more than one service
    Reused,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_enum, ignore_case = true)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings and resolve the vault path from `--vault` or config.
pub fn resolve_vault(cli: &Cli) -> Result<(PathBuf, Settings)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let path = match &cli.vault {
        Some(p) => p.clone(),
        None => settings.vault_path(&cwd),
    };
    Ok((path, settings))
}

/// Resolve the vault, ask for the passphrase, and unlock a session.
///
/// A missing vault file means a new vault: the passphrase is asked
/// for twice.
pub fn open_session(cli: &Cli) -> Result<(VaultSession, Settings)> {
    let (path, settings) = resolve_vault(cli)?;

    let password = if path.exists() {
        prompt_password()?
    } else {
        output::info(&format!("No vault at {}. A new one will be created.", path.display()));
        prompt_new_password()?
    };

    let mut session = VaultSession::new();
    session.unlock(&path, &password)?;
    Ok((session, settings))
}

/// Get the vault passphrase, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault passphrase")
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used for a new vault).
///
/// Also respects `PASSVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum passphrase length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        if pw.len() < MIN_PASSWORD_LEN {
            return Err(PassVaultError::CommandFailed(format!(
                "passphrase must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose vault passphrase")
                .with_confirmation(
                    "Confirm vault passphrase",
                    "Passphrases do not match, try again",
                )
                .interact()
                .map_err(|e| PassVaultError::CommandFailed(format!("passphrase prompt: {e}")))?,
        );

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var("PASSVAULT_PASSWORD")
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Trim a service name the way it was typed at the prompt.
pub fn normalize_service(service: &str) -> Result<&str> {
    let trimmed = service.trim();
    if trimmed.is_empty() {
        return Err(PassVaultError::InvalidServiceName(
            "service name cannot be empty".into(),
        ));
    }
    Ok(trimmed)
}
