//! `passvault delete` — remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{normalize_service, open_session, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, service: &str, force: bool) -> Result<()> {
    let service = normalize_service(service)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry '{service}'?"))
            .default(false)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let (mut session, _) = open_session(cli)?;

    session.delete(service)?;
    session.save()?;

    output::success(&format!("Deleted entry '{service}'"));
    session.lock();
    Ok(())
}
