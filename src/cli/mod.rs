//! Command-line interface.
//!
//! `main` parses the arguments first; `--version` and `--help` print and exit
//! before any configuration or logging is set up.

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{version_line, VERSION};

/// Text to print for informational commands, or `None` when the server
/// should run.
pub fn informational_output(command: &CliCommand) -> Option<String> {
    match command {
        CliCommand::Version => Some(version_line()),
        CliCommand::Help => Some(USAGE.to_string()),
        CliCommand::Serve { .. } => None,
    }
}
