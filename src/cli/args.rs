//! Command-line argument parsing.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Run the relay server; `port` overrides the configured one
    Serve { port: Option<u16> },
    /// Show version information
    Version,
    /// Show usage
    Help,
}

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: chat-relay [--port N] [--version|-V] [--help|-h]

Environment:
  CHAT_RELAY_UPSTREAM_URL      agent API base URL (default http://localhost:8000)
  CHAT_RELAY_HOST              bind address (default 0.0.0.0)
  CHAT_RELAY_PORT              bind port (default 3000)
  CHAT_RELAY_LOG               log filter, overridden by RUST_LOG (default info)
  CHAT_RELAY_CHANNEL_CAPACITY  frames buffered per request (default 32)
  CHAT_RELAY_CORS_ORIGINS      comma-separated allowed origins (default any)";

/// Parse command-line arguments and return the command to run.
///
/// The first item is the program name. `--version` and `--help` win over
/// anything else; an unparsable `--port` value is ignored.
///
/// # Examples
///
/// ```
/// use chat_relay::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chat-relay".to_string(), "--port".to_string(), "8080".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Serve { port: Some(8080) });
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut port = None;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--port" | "-p" => port = args.next().and_then(|v| v.parse().ok()),
            other => {
                if let Some(value) = other.strip_prefix("--port=") {
                    port = value.parse().ok();
                }
            }
        }
    }
    CliCommand::Serve { port }
}
