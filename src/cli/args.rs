//! CLI argument definitions.

use super::validators::{parse_clip_duration, parse_entry, parse_parallelism, parse_run_id};
use crate::config::OutputMode;
use crate::events::TimestampEntry;
use crate::report::RunId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Basketball shot-event aggregation and highlight compilation.
#[derive(Debug, Parser)]
#[command(name = "courtreel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output mode for command results.
    #[arg(long, value_enum, default_value_t = OutputMode::Human, global = true, env = "COURTREEL_OUTPUT_MODE")]
    pub output_mode: OutputMode,

    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "COURTREEL_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile selected moments into one highlight video.
    Compile(CompileArgs),
    /// Feed a recorded event stream through the live aggregator.
    Replay(ReplayArgs),
    /// Download the statistics report for a run.
    Report(ReportArgs),
    /// Check whether a file was already uploaded.
    CheckUpload(CheckUploadArgs),
    /// Validate match setup boundaries.
    Setup(SetupArgs),
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the compile subcommand.
#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Recording for camera angle 1.
    #[arg(long)]
    pub source: PathBuf,

    /// Recording for camera angle 2 (other half court).
    #[arg(long)]
    pub source2: Option<PathBuf>,

    /// Selection file (CSV with `Timestamp,Camera angle` columns).
    #[arg(long, conflicts_with = "timestamps", required_unless_present = "timestamps")]
    pub selection: Option<PathBuf>,

    /// Selected moment as `M:SS[@angle]`; repeat for more.
    #[arg(short = 't', long = "timestamp", value_parser = parse_entry)]
    pub timestamps: Vec<TimestampEntry>,

    /// Output file (default from config).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Clip length in seconds (1-60).
    #[arg(short, long, value_parser = parse_clip_duration, env = "COURTREEL_CLIP_DURATION")]
    pub duration: Option<u32>,

    /// ffmpeg executable.
    #[arg(long, env = "COURTREEL_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Clips extracted at the same time.
    #[arg(short, long, value_parser = parse_parallelism)]
    pub jobs: Option<usize>,
}

/// Arguments for the replay subcommand.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Recorded stream, one JSON event per line.
    pub events: PathBuf,
}

/// Service override shared by the network subcommands.
#[derive(Debug, Args)]
pub struct ServerArgs {
    /// Analysis service base URL (overrides config).
    #[arg(long, env = "COURTREEL_BASE_URL")]
    pub base_url: Option<String>,
}

/// Arguments for the report subcommand.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Run identifier issued at upload.
    #[arg(long, value_parser = parse_run_id)]
    pub run_id: RunId,

    /// Where to save the report.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Service options.
    #[command(flatten)]
    pub server: ServerArgs,
}

/// Arguments for the check-upload subcommand.
#[derive(Debug, Args)]
pub struct CheckUploadArgs {
    /// File name as it would be uploaded.
    pub filename: String,

    /// Service options.
    #[command(flatten)]
    pub server: ServerArgs,
}

/// Arguments for the setup subcommand.
#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Both half courts were filmed.
    #[arg(long)]
    pub full_court: bool,

    /// Teams switched sides during the game.
    #[arg(long, requires = "switch")]
    pub sides_switched: bool,

    /// When the teams switched sides (HH:MM:SS or MM:SS).
    #[arg(long)]
    pub switch: Option<String>,

    /// Quarter start (HH:MM:SS or MM:SS); repeat for each quarter.
    #[arg(long = "quarter")]
    pub quarters: Vec<String>,
}
