use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fittrack", bin_name = "fittrack", version, disable_help_subcommand = true)]
#[command(about = "Track weight goals, workout load and distance conversions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage backend for this run: memory, file or relational
    #[arg(long, global = true, help_heading = "Options")]
    pub backend: Option<String>,

    /// Path to a fittrack.toml
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate the weekly pace needed to reach a target weight
    #[command(display_order = 1)]
    Progress {
        /// Current weight in kg
        #[arg(long)]
        current: f64,

        /// Target weight in kg
        #[arg(long)]
        target: f64,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Workouts this week
        #[arg(long, default_value_t = 0)]
        workouts: u32,

        /// Average workout duration in minutes
        #[arg(long, default_value_t = 0)]
        duration: u32,
    },

    /// Check this week's training load for overtraining
    #[command(display_order = 2)]
    Workload {
        #[arg(long)]
        workouts: u32,

        /// Average workout duration in minutes
        #[arg(long)]
        duration: u32,
    },

    /// Convert miles to kilometres
    #[command(display_order = 3)]
    Convert {
        #[arg(allow_negative_numbers = true)]
        miles: f64,
    },

    /// List, search and edit the operation history
    #[command(alias = "h", display_order = 4, args_conflicts_with_subcommands = true)]
    History {
        #[command(subcommand)]
        action: Option<HistoryCommands>,

        #[command(flatten)]
        view: HistoryView,
    },

    /// Show or delete the current profile
    #[command(display_order = 5)]
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommands>,
    },

    /// Switch storage backend and show its history
    #[command(display_order = 6)]
    Backend {
        /// memory, file or relational
        kind: String,
    },

    /// Show the resolved configuration
    #[command(display_order = 7)]
    Config {
        /// Print a commented sample fittrack.toml instead
        #[arg(long)]
        template: bool,
    },
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct HistoryView {
    /// Case-insensitive text search in type and details
    #[arg(long, conflicts_with_all = ["operation_type", "sort"])]
    pub search: Option<String>,

    /// Only entries with exactly this operation type
    #[arg(long = "type", conflicts_with = "sort")]
    pub operation_type: Option<String>,

    /// Sort by date, operationType or details
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List entries (default)
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        view: HistoryView,
    },

    /// Show one entry in full
    Show { id: i64 },

    /// Change fields of an entry
    Edit {
        id: i64,

        #[arg(long = "type")]
        operation_type: Option<String>,

        #[arg(long)]
        details: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Permanently remove an entry
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Mark an entry active
    Activate { id: i64 },

    /// Mark an entry inactive (hidden, not deleted)
    Deactivate { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the current profile (default)
    Show,

    /// Delete the current profile
    Delete,
}
