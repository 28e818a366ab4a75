//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the anniv CLI.

use std::path::PathBuf;

use anniv_filter_rs::filter::{ExecutionMode, FlatFilterConfig};
use anniv_filter_rs::presets::ViewType;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// anniv - Filter anniversary attendee exports
#[derive(Parser, Debug)]
#[command(name = "anniv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter an attendee export
    #[command(alias = "f")]
    Filter {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Where to run the filter (default: from config)
        #[arg(long)]
        mode: Option<ExecutionMode>,

        /// Print shirt totals instead of the matching people
        #[arg(long)]
        summary: bool,

        /// Limit the number of people shown
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List and manage saved filters
    #[command(alias = "p")]
    Presets {
        #[command(subcommand)]
        command: Option<PresetsCommands>,
    },

    /// Show shirt prices
    Price {
        /// Shirt size (omit to show the full price table)
        size: Option<String>,

        /// Price with print
        #[arg(long)]
        print: bool,
    },

    /// Update payment or distribution for every matching person
    Mark {
        #[command(flatten)]
        input: InputArgs,

        /// Who is making the change (must be a manager)
        #[arg(long, env = "ANNIV_USER")]
        user: String,

        #[command(flatten)]
        change: MarkArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Show what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Input files for commands that read an export.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Attendee export (JSON array of people)
    #[arg(long, value_name = "FILE")]
    pub people: PathBuf,

    /// Task info export (JSON object keyed by person id)
    #[arg(long, value_name = "FILE")]
    pub tasks: Option<PathBuf>,
}

/// Which filter to apply: a group file, a saved preset, or flat options.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Filter group file (JSON)
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub group: Option<PathBuf>,

    /// Saved filter id or name
    #[arg(long)]
    pub preset: Option<String>,

    /// View the saved filter belongs to
    #[arg(long, default_value = "shirts")]
    pub view: ViewType,

    #[command(flatten)]
    pub flat: FlatArgs,
}

/// Flat filter options, combined with AND.
#[derive(Args, Debug, Clone, Default)]
pub struct FlatArgs {
    /// Name contains (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// paid or unpaid
    #[arg(long)]
    pub payment: Option<String>,

    /// withPrint or plain
    #[arg(long)]
    pub print_status: Option<String>,

    /// given or pending
    #[arg(long)]
    pub distribution: Option<String>,

    /// registered or notRegistered
    #[arg(long)]
    pub registration: Option<String>,

    /// checkedIn or notCheckedIn
    #[arg(long)]
    pub check_in: Option<String>,

    /// Toddler, Kid, Youth or Adult
    #[arg(long)]
    pub age_bracket: Option<String>,

    /// Main, Cobol, Malacañang or Guest
    #[arg(long)]
    pub location: Option<String>,

    /// attending or shirt_only
    #[arg(long)]
    pub attendance: Option<String>,

    /// Size category (repeatable): Kids, Teen, Adult, "No Order"
    #[arg(long = "category", action = clap::ArgAction::Append)]
    pub categories: Vec<String>,

    /// Shirt size (repeatable)
    #[arg(long = "size", action = clap::ArgAction::Append)]
    pub sizes: Vec<String>,

    /// Minimum shirt amount
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Maximum shirt amount
    #[arg(long)]
    pub max_amount: Option<f64>,

    #[arg(long)]
    pub has_notes: bool,

    #[arg(long)]
    pub has_tasks: bool,

    #[arg(long)]
    pub has_overdue_tasks: bool,

    #[arg(long)]
    pub missing_contact: bool,

    #[arg(long)]
    pub missing_size: bool,

    #[arg(long)]
    pub missing_info: bool,

    #[arg(long)]
    pub has_shirt_order: bool,
}

impl FlatArgs {
    /// Converts the options into a flat filter config.
    pub fn to_config(&self) -> FlatFilterConfig {
        let choice = |value: &Option<String>, default: String| value.clone().unwrap_or(default);
        let amount = |value: Option<f64>| value.map(|n| n.to_string()).unwrap_or_default();
        let defaults = FlatFilterConfig::default();

        FlatFilterConfig {
            search: self.search.clone().unwrap_or_default(),
            payment_status: choice(&self.payment, defaults.payment_status),
            print_status: choice(&self.print_status, defaults.print_status),
            distribution_status: choice(&self.distribution, defaults.distribution_status),
            registration_status: choice(&self.registration, defaults.registration_status),
            check_in_status: choice(&self.check_in, defaults.check_in_status),
            age_bracket: choice(&self.age_bracket, defaults.age_bracket),
            location: choice(&self.location, defaults.location),
            attendance_status: choice(&self.attendance, defaults.attendance_status),
            categories: self.categories.clone(),
            sizes: self.sizes.clone(),
            min_amount: amount(self.min_amount),
            max_amount: amount(self.max_amount),
            has_notes: self.has_notes,
            has_tasks: self.has_tasks,
            has_overdue_tasks: self.has_overdue_tasks,
            missing_contact: self.missing_contact,
            missing_size: self.missing_size,
            missing_info: self.missing_info,
            has_shirt_order: self.has_shirt_order,
            extra: defaults.extra,
        }
    }
}

/// The change `mark` applies.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MarkArgs {
    /// Mark as paid
    #[arg(long)]
    pub paid: bool,

    /// Mark as unpaid
    #[arg(long)]
    pub unpaid: bool,

    /// Mark shirt as given
    #[arg(long)]
    pub given: bool,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Saved filter subcommands
#[derive(Subcommand, Debug)]
pub enum PresetsCommands {
    /// List saved filters (default)
    List {
        /// View to list
        #[arg(long, default_value = "shirts")]
        view: ViewType,
    },

    /// Show a saved filter
    Show {
        /// Saved filter id or name
        id_or_name: String,

        #[arg(long, default_value = "shirts")]
        view: ViewType,
    },

    /// Save flat filter options under a name
    Save {
        /// Name for the saved filter
        name: String,

        #[arg(long, default_value = "shirts")]
        view: ViewType,

        #[command(flatten)]
        flat: FlatArgs,
    },

    /// Delete a saved filter
    Delete {
        /// Saved filter id or name
        id_or_name: String,

        #[arg(long, default_value = "shirts")]
        view: ViewType,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
