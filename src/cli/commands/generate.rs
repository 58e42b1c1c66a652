//! `passvault generate` — create an entry with a random secret.

use crate::cli::{clipboard, normalize_service, open_session, output, Cli};
use crate::errors::Result;
use crate::generator::CharacterClasses;

/// Character-class switches from the command line.
pub struct ClassFlags {
    pub no_lowercase: bool,
    pub no_uppercase: bool,
    pub no_digits: bool,
    pub no_symbols: bool,
}

/// Execute the `generate` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    username: &str,
    email: &str,
    length: Option<usize>,
    flags: &ClassFlags,
    no_copy: bool,
) -> Result<()> {
    let service = normalize_service(service)?;
    let (mut session, settings) = open_session(cli)?;

    let base = settings.character_classes();
    let classes = CharacterClasses {
        lowercase: base.lowercase && !flags.no_lowercase,
        uppercase: base.uppercase && !flags.no_uppercase,
        digits: base.digits && !flags.no_digits,
        symbols: base.symbols && !flags.no_symbols,
    };
    let length = length.unwrap_or(settings.generator_length);

    let secret = session.generate_and_create(
        service,
        username.trim(),
        email.trim(),
        length,
        &classes,
    )?;
    session.save()?;
    output::success(&format!("Entry '{service}' saved with a {length}-character secret"));

    let copied = if settings.copy_to_clipboard && !no_copy {
        match clipboard::copy(&secret) {
            Ok(()) => true,
            Err(e) => {
                output::warning(&e.to_string());
                false
            }
        }
    } else {
        false
    };

    if copied {
        output::success("The secret has been copied to the clipboard.");
    } else {
        println!("{}", secret.as_str());
    }

    session.lock();
    Ok(())
}
