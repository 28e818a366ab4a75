//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split into two groups: local commands that only touch config or
//! static tables and run synchronously, and data commands that read exports
//! or the preset file and run on the async runtime.

use anniv_filter_rs::{ExecutionMode, ViewType};

use crate::cli::{
    Cli, Commands, ConfigCommands, InputArgs, MarkArgs, PresetsCommands, SelectionArgs, Shell,
};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without touching attendee data.
pub trait LocalCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that load attendee data or saved filters.
#[allow(async_fn_in_trait)]
pub trait DataCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Commands that run synchronously.
pub enum LocalDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Price {
        size: Option<&'a str>,
        print: bool,
    },
    Help,
}

impl<'a> LocalDispatch<'a> {
    /// Returns None if the command needs the async runtime.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            Some(Commands::Price { size, print }) => Some(Self::Price {
                size: size.as_deref(),
                print: *print,
            }),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl LocalCommand for LocalDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Price { size, print } => commands::price::execute(ctx, *size, *print),
            Self::Help => {
                if !ctx.quiet {
                    println!("anniv - Filter anniversary attendee exports");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that run on the async runtime.
pub enum DataDispatch<'a> {
    Filter {
        input: &'a InputArgs,
        selection: &'a SelectionArgs,
        mode: Option<ExecutionMode>,
        summary: bool,
        limit: Option<usize>,
    },
    Presets(&'a Option<PresetsCommands>),
    Mark {
        input: &'a InputArgs,
        user: &'a str,
        change: &'a MarkArgs,
        selection: &'a SelectionArgs,
        dry_run: bool,
    },
}

impl<'a> DataDispatch<'a> {
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Filter {
                input,
                selection,
                mode,
                summary,
                limit,
            }) => Some(Self::Filter {
                input,
                selection,
                mode: *mode,
                summary: *summary,
                limit: *limit,
            }),
            Some(Commands::Presets { command }) => Some(Self::Presets(command)),
            Some(Commands::Mark {
                input,
                user,
                change,
                selection,
                dry_run,
            }) => Some(Self::Mark {
                input,
                user,
                change,
                selection,
                dry_run: *dry_run,
            }),
            _ => None,
        }
    }
}

impl DataCommand for DataDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Filter {
                input,
                selection,
                mode,
                summary,
                limit,
            } => {
                let opts = commands::filter::FilterOptions {
                    input,
                    selection,
                    mode: *mode,
                    summary: *summary,
                    limit: *limit,
                };
                commands::filter::execute(ctx, &opts).await
            }
            Self::Presets(command) => dispatch_presets(ctx, command).await,
            Self::Mark {
                input,
                user,
                change,
                selection,
                dry_run,
            } => {
                let opts = commands::mark::MarkOptions {
                    input,
                    user,
                    change: commands::mark::Change::from_args(change),
                    selection,
                    dry_run: *dry_run,
                };
                commands::mark::execute(ctx, &opts).await
            }
        }
    }
}

async fn dispatch_presets(ctx: &CommandContext, command: &Option<PresetsCommands>) -> Result<()> {
    match command {
        None => commands::presets::execute_list(ctx, ViewType::Shirts).await,
        Some(PresetsCommands::List { view }) => commands::presets::execute_list(ctx, *view).await,
        Some(PresetsCommands::Show { id_or_name, view }) => {
            commands::presets::execute_show(ctx, *view, id_or_name).await
        }
        Some(PresetsCommands::Save { name, view, flat }) => {
            commands::presets::execute_save(ctx, *view, name, flat.to_config()).await
        }
        Some(PresetsCommands::Delete { id_or_name, view }) => {
            commands::presets::execute_delete(ctx, *view, id_or_name).await
        }
    }
}
