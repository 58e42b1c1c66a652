//! `passvault update` — change fields of an existing entry.

use crate::cli::commands::add::read_secret;
use crate::cli::{normalize_service, open_session, output, Cli};
use crate::errors::{PassVaultError, Result};
use crate::vault::EntryUpdate;

/// Execute the `update` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    username: Option<&str>,
    email: Option<&str>,
    new_secret: bool,
) -> Result<()> {
    let service = normalize_service(service)?;
    let (mut session, _) = open_session(cli)?;

    // Fail before prompting for a secret nobody will store.
    session.read(service)?;

    let mut update = EntryUpdate::new();
    if let Some(u) = username {
        update = update.username(u.trim());
    }
    if let Some(e) = email {
        update = update.email(e.trim());
    }
    if new_secret {
        let secret = read_secret(&format!("Enter the new secret for {service}"))?;
        update = update.secret(secret.as_str());
    }

    if update.is_empty() {
        return Err(PassVaultError::CommandFailed(
            "nothing to update; pass --username, --email, or --secret".into(),
        ));
    }

    session.update(service, &update)?;
    session.save()?;

    output::success(&format!("Entry '{service}' updated"));
    session.lock();
    Ok(())
}
