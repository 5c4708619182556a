//! Clap derive structures for the `fleetwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fleetwatch -- query and follow a fleet tracking service
#[derive(Debug, Parser)]
#[command(
    name = "fleetwatch",
    version,
    about = "Track delivery vehicles from the command line",
    long_about = "A CLI for the fleet tracking service.\n\n\
        Lists vehicles and fleet statistics over REST, and follows live\n\
        updates from the push channel with `fleetwatch watch`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service profile to use
    #[arg(long, short = 'p', env = "FLEETWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// REST base URL (overrides profile)
    #[arg(long, env = "FLEETWATCH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Push channel URL (overrides profile)
    #[arg(long, env = "FLEETWATCH_WS_URL", global = true)]
    pub ws_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FLEETWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FLEETWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Vehicle status filter as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    All,
    Idle,
    #[value(name = "en_route", alias = "en-route")]
    EnRoute,
    Delivered,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect vehicles
    #[command(alias = "v")]
    Vehicles(VehiclesArgs),

    /// Show fleet statistics
    Stats,

    /// Follow live fleet updates until interrupted
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Vehicles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VehiclesArgs {
    #[command(subcommand)]
    pub command: VehiclesCommand,
}

#[derive(Debug, Subcommand)]
pub enum VehiclesCommand {
    /// List vehicles, optionally by status
    #[command(alias = "ls")]
    List {
        /// Only vehicles with this status
        #[arg(long, short = 's', default_value = "all")]
        status: StatusArg,
    },

    /// Show one vehicle
    Get {
        /// Vehicle ID
        id: String,
    },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Status filter applied to the live vehicle list
    #[arg(long, short = 'f', default_value = "all")]
    pub filter: StatusArg,

    /// Stop after this many seconds (default: run until Ctrl-C)
    #[arg(long, short = 'd')]
    pub duration: Option<u64>,

    /// Do not open the push channel; rely on periodic refresh only
    #[arg(long)]
    pub no_push: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init {
        /// Profile name to create
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
