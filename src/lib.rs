//! Courtreel - basketball shot-event aggregation and highlight compilation.
//!
//! Detection events from an analysis service are deduplicated into per-team
//! scoring and shooting collections; selected moments are cut from one or two
//! camera recordings and joined losslessly into a single highlight video.

#![warn(missing_docs)]

pub mod aggregator;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod output;
pub mod report;
pub mod selection;
pub mod setup;
pub mod timestamp;

use aggregator::{AggregatorView, LiveAggregator};
use clap::Parser;
use cli::{CheckUploadArgs, Cli, Command, ConfigAction, ReplayArgs, ReportArgs, ServerArgs, SetupArgs};
use config::{Config, OutputMode, ServerConfig, config_file_path, load_config, save_config};
use constants::server::DEFAULT_REPORT_FILE;
use events::{StreamEvent, Team};
use output::{
    ConfigPayload, ReplayPayload, ReportPayload, ResultType, SetupPayload, UploadCheckPayload,
    emit_json_error, emit_json_result,
};
use report::ReportClient;
use setup::MatchSetup;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub use error::{Error, Result};

/// Buffered stream messages between the reader and the aggregator.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Main entry point for courtreel CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    let output_mode = cli.output_mode;
    let result = handle_command(cli);
    if output_mode.is_structured()
        && let Err(ref e) = result
    {
        emit_json_error(e);
    }
    result
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // Logs on stderr keep stdout clean for results.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();

    if let Command::Config { action } = cli.command {
        return handle_config_command(action, config_path.as_deref(), cli.output_mode);
    }

    // Load configuration
    let config = load_config(config_path.as_deref())?;
    config::validate_config(&config)?;

    match cli.command {
        Command::Compile(args) => {
            compiler::command::execute(&args, &config.highlight, cli.output_mode, !cli.quiet)
        }
        Command::Replay(args) => handle_replay(&args, cli.output_mode),
        Command::Report(args) => handle_report(&args, &config.server, cli.output_mode),
        Command::CheckUpload(args) => handle_check_upload(&args, &config.server, cli.output_mode),
        Command::Setup(args) => handle_setup(args, cli.output_mode),
        Command::Config { action } => {
            handle_config_command(action, config_path.as_deref(), cli.output_mode)
        }
    }
}

fn async_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("Failed to create async runtime: {e}"),
    })
}

/// Handle the `replay` command.
fn handle_replay(args: &ReplayArgs, output_mode: OutputMode) -> Result<()> {
    let file = std::fs::File::open(&args.events)?;
    let events = events::read_event_log(std::io::BufReader::new(file))?;
    let events_read = events.len();
    info!(
        "Replaying {events_read} event(s) from {}",
        args.events.display()
    );

    let runtime = async_runtime()?;
    let view = runtime.block_on(replay_events(events));

    if let Some(e) = view.status.error() {
        warn!("{e}; aggregated moments remain valid");
    }
    if !view.finalized {
        warn!("Stream ended before processing completed");
    }

    let counts = view.state.counts();
    if output_mode.is_structured() {
        emit_json_result(&ReplayPayload {
            result_type: ResultType::Replay,
            events_read,
            counts,
            view,
        });
        return Ok(());
    }

    print_view(&view);
    println!(
        "Attempts: A {} / B {}",
        counts.attempts(Team::A),
        counts.attempts(Team::B)
    );
    Ok(())
}

/// Push recorded events through the live aggregator over a channel, the way a
/// transport would deliver them.
async fn replay_events(events: Vec<StreamEvent>) -> AggregatorView {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let mut aggregator = LiveAggregator::new();

    let producer = tokio::spawn(async move {
        for event in events {
            if tx.send(event).await.is_err() {
                debug!("Aggregator stopped listening; dropping remaining events");
                break;
            }
        }
    });

    aggregator.consume(rx).await;
    if let Err(e) = producer.await {
        warn!("Event producer failed: {e}");
    }

    aggregator.view()
}

fn print_view(view: &AggregatorView) {
    let state = &view.state;
    for (label, set) in [
        ("Scoring A", &state.scoring_a),
        ("Scoring B", &state.scoring_b),
        ("Shooting A", &state.shooting_a),
        ("Shooting B", &state.shooting_b),
    ] {
        let entries: Vec<String> = set.iter().map(ToString::to_string).collect();
        println!("{label} ({}): {}", set.len(), entries.join(", "));
    }
    println!("Finalized: {}", if view.finalized { "yes" } else { "no" });
    if let Some(summary) = &view.summary {
        println!("Summary: {}", summary.0);
    }
}

fn server_config(base: &ServerConfig, overrides: &ServerArgs) -> Result<ServerConfig> {
    let mut server = base.clone();
    if let Some(url) = &overrides.base_url {
        server.base_url.clone_from(url);
        report::endpoint_url(&server.base_url, &server.report_path)?;
    }
    Ok(server)
}

/// Handle the `report` command.
fn handle_report(args: &ReportArgs, server: &ServerConfig, output_mode: OutputMode) -> Result<()> {
    let client = ReportClient::new(&server_config(server, &args.server)?)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE));

    let runtime = async_runtime()?;
    let bytes = runtime.block_on(client.download_report(&args.run_id, &output))?;

    if output_mode.is_structured() {
        emit_json_result(&ReportPayload {
            result_type: ResultType::Report,
            run_id: args.run_id.clone(),
            output_file: output,
            bytes,
        });
    } else {
        println!("{}", output.display());
    }
    Ok(())
}

/// Handle the `check-upload` command.
fn handle_check_upload(
    args: &CheckUploadArgs,
    server: &ServerConfig,
    output_mode: OutputMode,
) -> Result<()> {
    let client = ReportClient::new(&server_config(server, &args.server)?)?;
    let runtime = async_runtime()?;
    let exists = runtime.block_on(client.upload_exists(&args.filename))?;

    if output_mode.is_structured() {
        emit_json_result(&UploadCheckPayload {
            result_type: ResultType::UploadCheck,
            filename: args.filename.clone(),
            exists,
        });
    } else if exists {
        println!("{}: already uploaded", args.filename);
    } else {
        println!("{}: not uploaded", args.filename);
    }
    Ok(())
}

/// Handle the `setup` command.
fn handle_setup(args: SetupArgs, output_mode: OutputMode) -> Result<()> {
    let setup = MatchSetup {
        full_court: args.full_court,
        sides_switched: args.sides_switched,
        switch_time: args.switch,
        quarter_starts: args.quarters,
    };
    let normalized = setup.normalized()?;

    if output_mode.is_structured() {
        emit_json_result(&SetupPayload {
            result_type: ResultType::Setup,
            setup: normalized,
        });
        return Ok(());
    }

    for (i, start) in normalized.quarter_starts.iter().enumerate() {
        println!("Quarter {}: {start}", i + 1);
    }
    if let Some(switch) = &normalized.switch_time {
        println!("Sides switched at: {switch}");
    }
    if normalized.requires_second_angle {
        println!("Full court: supply --source2 when compiling angle 2 moments");
    }
    Ok(())
}

fn handle_config_command(
    action: ConfigAction,
    config_path: Option<&Path>,
    output_mode: OutputMode,
) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(Some(&path))?;
            if output_mode.is_structured() {
                let value =
                    serde_json::to_value(&config).map_err(|e| Error::JsonSerialize { source: e })?;
                emit_json_result(&ConfigPayload {
                    result_type: ResultType::Config,
                    config_path: path,
                    config: value,
                });
            } else {
                let contents = toml::to_string_pretty(&config)
                    .map_err(|e| Error::ConfigSerialize { source: e })?;
                println!("# {}", path.display());
                print!("{contents}");
            }
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
