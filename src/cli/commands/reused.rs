//! `passvault reused` — report secrets shared between services.

use crate::cli::{open_session, output, Cli};
use crate::errors::Result;

/// Execute the `reused` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (mut session, _) = open_session(cli)?;

    let groups = session.group_by_secret()?;
    output::print_reuse_table(&groups);

    session.lock();
    Ok(())
}
