//! `passvault add` — save a new entry.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{normalize_service, open_session, Cli};
use crate::errors::{PassVaultError, Result};
use crate::vault::CredentialEntry;

/// Execute the `add` command.
pub fn execute(cli: &Cli, service: &str, username: &str, email: &str) -> Result<()> {
    let service = normalize_service(service)?;

    let (mut session, _) = open_session(cli)?;
    if session.read(service).is_ok() {
        return Err(PassVaultError::DuplicateService(service.to_string()));
    }

    let secret = read_secret(&format!("Enter the secret for {service}"))?;
    session.create(
        service,
        CredentialEntry::new(username.trim(), email.trim(), secret.as_str()),
    )?;
    session.save()?;

    output::success(&format!(
        "Entry '{service}' saved ({} total)",
        session.len()?
    ));
    session.lock();
    Ok(())
}

/// Read a secret from piped stdin, or prompt for it without echo.
pub(crate) fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    let secret = if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(prompt)
                .interact()
                .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))?,
        )
    };

    if secret.is_empty() {
        return Err(PassVaultError::CommandFailed("secret cannot be empty".into()));
    }
    Ok(secret)
}
