use clap::Parser;
use passvault::cli::commands::generate::ClassFlags;
use passvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr; silence everything below `warn` unless
    // PASSVAULT_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PASSVAULT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add {
            ref service,
            ref username,
            ref email,
        } => passvault::cli::commands::add::execute(&cli, service, username, email),
        Commands::Get {
            ref service,
            show,
            copy,
        } => passvault::cli::commands::get::execute(&cli, service, show, copy),
        Commands::List => passvault::cli::commands::list::execute(&cli),
        Commands::Update {
            ref service,
            ref username,
            ref email,
            secret,
        } => passvault::cli::commands::update::execute(
            &cli,
            service,
            username.as_deref(),
            email.as_deref(),
            secret,
        ),
        Commands::Delete { ref service, force } => {
            passvault::cli::commands::delete::execute(&cli, service, force)
        }
        Commands::Generate {
            ref service,
            ref username,
            ref email,
            length,
            no_lowercase,
            no_uppercase,
            no_digits,
            no_symbols,
            no_copy,
        } => passvault::cli::commands::generate::execute(
            &cli,
            service,
            username,
            email,
            length,
            &ClassFlags {
                no_lowercase,
                no_uppercase,
                no_digits,
                no_symbols,
            },
            no_copy,
        ),
        Commands::Reused => passvault::cli::commands::reused::execute(&cli),
        Commands::Completions { shell } => passvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
