//! `passvault get` — show a single entry.

use crate::cli::{clipboard, normalize_service, open_session, output, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, service: &str, show: bool, copy: bool) -> Result<()> {
    let service = normalize_service(service)?;
    let (mut session, _) = open_session(cli)?;

    let entry = session.read(service)?;
    output::print_entries_table(&[(service, entry)]);

    if show {
        println!("{}", entry.secret);
    }
    if copy {
        clipboard::copy(&entry.secret)?;
        output::success("Secret copied to the clipboard.");
    }

    session.lock();
    Ok(())
}
