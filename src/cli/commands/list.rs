//! `passvault list` — display all entries in a table.

use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (mut session, _) = open_session(cli)?;

    let entries = session.list()?;
    output::info(&format!("Total saved entries: {}", entries.len()));
    output::print_entries_table(&entries);

    session.lock();
    Ok(())
}
