use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use anniv_filter_rs::PresetError;
use cli::Cli;
use commands::{CommandContext, CommandError};
use dispatch::{DataCommand, DataDispatch, LocalCommand, LocalDispatch};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                let text = serde_json::to_string_pretty(&error_json)
                    .unwrap_or_else(|_| error_json.to_string());
                eprintln!("{text}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Sends logs to stderr so JSON on stdout stays parseable.
///
/// `RUST_LOG` wins over the level picked from `--verbose` / `--quiet`.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    if let Some(dispatch) = LocalDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    match DataDispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx).await,
        None => Err(CommandError::Input(format!(
            "unhandled command: {:?}",
            cli.command
        ))),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Preset(PresetError::NotFound { .. }) => "NOT_FOUND",
        CommandError::Preset(_) => "PRESET_ERROR",
        CommandError::Store(_) => "STORAGE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Permission { .. } => "PERMISSION_DENIED",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Filter(_) => 1,
        CommandError::Preset(
            PresetError::Store(_) | PresetError::Corrupt { .. } | PresetError::Encode(_),
        ) => 5,
        CommandError::Preset(_) => 1,
        CommandError::Store(_) => 5,
        CommandError::Config(_) => 5,
        CommandError::Permission { .. } => 4,
        CommandError::Input(_) => 3,
        CommandError::Io(_) => 3,
        CommandError::Json(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anniv_filter_rs::{FilterError, ViewType};

    fn cli_with(verbose: bool, quiet: bool) -> Cli {
        Cli {
            verbose,
            quiet,
            json: false,
            no_color: false,
            command: None,
        }
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(&cli_with(false, false)), "warn");
        assert_eq!(default_log_level(&cli_with(true, false)), "debug");
        assert_eq!(default_log_level(&cli_with(false, true)), "error");
    }

    #[test]
    fn test_error_codes() {
        let not_found = CommandError::Preset(PresetError::NotFound {
            view: ViewType::Shirts,
            needle: "x".to_string(),
            suggestion: None,
        });
        assert_eq!(error_code(&not_found), "NOT_FOUND");
        assert_eq!(exit_status(&not_found), 1);

        let denied = CommandError::Permission {
            user: "carol".to_string(),
        };
        assert_eq!(error_code(&denied), "PERMISSION_DENIED");
        assert_eq!(exit_status(&denied), 4);

        let worker = CommandError::Filter(FilterError::worker("gone"));
        assert_eq!(error_code(&worker), "FILTER_ERROR");

        let input = CommandError::Input("bad".to_string());
        assert_eq!(exit_status(&input), 3);

        let config = CommandError::Config("bad".to_string());
        assert_eq!(exit_status(&config), 5);
    }
}
