//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{CredentialEntry, SecretGroup};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entries (Service, Username, Email).  Secrets are masked.
pub fn print_entries_table(entries: &[(&str, &CredentialEntry)]) {
    if entries.is_empty() {
        info("No saved entries yet.");
        tip("Run `passvault add <SERVICE>` or `passvault generate <SERVICE>`.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Username", "Email", "Secret"]);

    for (service, entry) in entries {
        table.add_row(vec![
            service.to_string(),
            entry.username.clone(),
            entry.email.clone(),
            "********".to_string(),
        ]);
    }

    println!("{table}");
}

/// Print groups of services that share a secret, without the secret itself.
pub fn print_reuse_table(groups: &[SecretGroup]) {
    let reused: Vec<&SecretGroup> = groups.iter().filter(|g| g.is_reused()).collect();
    if reused.is_empty() {
        success("No secret is used by more than one service.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Count", "Services"]);

    for group in &reused {
        let services: Vec<&str> = group.services().iter().map(String::as_str).collect();
        table.add_row(vec![group.services().len().to_string(), services.join(", ")]);
    }

    println!("{table}");
    warning(&format!(
        "{} secret(s) are shared between services. Consider rotating them.",
        reused.len()
    ));
}
