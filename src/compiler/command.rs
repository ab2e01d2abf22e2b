//! Compile command execution.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::Error;
use crate::cli::CompileArgs;
use crate::config::{HighlightConfig, OutputMode};
use crate::events::CameraAngle;
use crate::output::progress;
use crate::output::{ClipEntry, HighlightPayload, ResultType, emit_json_result};
use crate::selection::{SelectionSet, parse_selection_file};

use super::{ClipCompiler, CompileOptions, FfmpegBackend, SourceVideo, SourceVideos};

/// Settings resolved from flags over config.
struct Resolved {
    output: PathBuf,
    options: CompileOptions,
    ffmpeg: PathBuf,
}

impl Resolved {
    fn new(args: &CompileArgs, config: &HighlightConfig) -> Self {
        Self {
            output: args
                .output
                .clone()
                .unwrap_or_else(|| config.output_file.clone()),
            options: CompileOptions {
                clip_duration_secs: args.duration.unwrap_or(config.clip_duration_secs),
                max_parallel_extractions: args.jobs.unwrap_or(config.max_parallel_extractions),
            },
            ffmpeg: args
                .ffmpeg
                .clone()
                .unwrap_or_else(|| config.ffmpeg_path.clone()),
        }
    }
}

/// Execute the compile command.
///
/// # Errors
///
/// Returns an error if the selection is invalid or compilation fails.
pub fn execute(
    args: &CompileArgs,
    config: &HighlightConfig,
    output_mode: OutputMode,
    show_progress: bool,
) -> Result<(), Error> {
    let resolved = Resolved::new(args, config);
    let is_json = output_mode.is_structured();

    let selection = load_selection(args)?;
    let entries = selection.sorted_by_time();
    info!("Compiling {} selected moment(s)", entries.len());

    let sources = load_sources(args)?;

    let compiler = ClipCompiler::new(FfmpegBackend::new(resolved.ffmpeg.clone()), resolved.options);
    let pb = progress::create_clip_progress(entries.len(), show_progress && !is_json);
    let result = compiler.compile_with_progress(&entries, &sources, &|p| {
        progress::update_clip_progress(pb.as_ref(), p);
    });

    let highlight = match result {
        Ok(highlight) => {
            progress::finish_progress(pb, "done");
            highlight
        }
        Err(e) => {
            progress::finish_progress(pb, "failed");
            return Err(e);
        }
    };

    highlight.write_to(&resolved.output)?;

    if is_json {
        let payload = HighlightPayload {
            result_type: ResultType::Highlight,
            output_file: resolved.output,
            bytes: highlight.len(),
            media_type: highlight.media_type().to_string(),
            clip_duration_secs: highlight.clip_duration_secs(),
            clips: highlight
                .entries()
                .iter()
                .enumerate()
                .map(|(i, e)| ClipEntry::new(i, e))
                .collect(),
        };
        emit_json_result(&payload);
        return Ok(());
    }

    info!(
        "Wrote {} clip(s) ({} bytes) to {}",
        highlight.entries().len(),
        highlight.len(),
        resolved.output.display()
    );
    // Human-readable: print only the output path to stdout
    println!("{}", resolved.output.display());

    Ok(())
}

/// Build the selection from `--selection` or repeated `-t` flags.
fn load_selection(args: &CompileArgs) -> Result<SelectionSet, Error> {
    let selection = match &args.selection {
        Some(path) => {
            info!("Reading selection from {}", path.display());
            parse_selection_file(path)?
        }
        None => {
            let selection: SelectionSet = args.timestamps.iter().copied().collect();
            if selection.len() < args.timestamps.len() {
                warn!(
                    "Ignoring {} repeated timestamp(s)",
                    args.timestamps.len() - selection.len()
                );
            }
            selection
        }
    };

    if selection.is_empty() {
        return Err(Error::EmptySelection);
    }
    Ok(selection)
}

/// Load the recordings referenced by the flags.
fn load_sources(args: &CompileArgs) -> Result<SourceVideos, Error> {
    let first = SourceVideo::from_path(CameraAngle::One, &args.source)?;
    let second = args
        .source2
        .as_deref()
        .map(|path| SourceVideo::from_path(CameraAngle::Two, path))
        .transpose()?;
    SourceVideos::new(first, second)
}
