//! One module per subcommand.

pub mod add;
pub mod completions;
pub mod delete;
pub mod generate;
pub mod get;
pub mod list;
pub mod reused;
pub mod update;
