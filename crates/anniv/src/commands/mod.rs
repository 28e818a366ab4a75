//! Command implementations for the anniv CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod filter;
pub mod input;
pub mod mark;
pub mod presets;
pub mod price;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter run error.
    #[error("filter error: {0}")]
    Filter(#[from] anniv_filter_rs::FilterError),

    /// Saved filter error.
    #[error("{0}")]
    Preset(#[from] anniv_filter_rs::PresetError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] anniv_filter_rs::StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The user may not modify attendee records.
    #[error("'{user}' is not allowed to modify attendee records")]
    Permission { user: String },

    /// Bad input file or argument.
    #[error("invalid input: {0}")]
    Input(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are off when `--no-color` is given, `NO_COLOR` is set, or the
    /// config disables them.
    pub fn from_cli(cli: &Cli) -> Self {
        let config_color = config::load_config()
            .ok()
            .and_then(|config| config.output.color)
            .unwrap_or(true);

        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none() && config_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }

    /// Prints a non-fatal notice to stderr unless quiet.
    pub fn notice(&self, message: &str) {
        if !self.quiet {
            eprintln!("Warning: {message}");
        }
    }
}
