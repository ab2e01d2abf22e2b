//! Media backends performing copy-remux extraction and concatenation.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::constants::highlight::{DEFAULT_FFMPEG, STDERR_TAIL_LINES};

/// Failure inside a media backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The tool could not be started.
    #[error("failed to start '{program}'")]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and reported failure.
    #[error("'{program}' exited with {}: {stderr}", describe_exit(.code))]
    Failed {
        /// Program that failed.
        program: PathBuf,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Tail of the tool's diagnostic output.
        stderr: String,
    },

    /// File handling around the tool failed.
    #[error("media I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("status {c}"))
}

/// Lossless media operations used by the clip compiler.
///
/// Implementations must not modify `input` files; the compiler may extract
/// several clips from the same source concurrently.
pub trait MediaBackend: Send + Sync {
    /// Copy `duration_secs` seconds starting at `start_secs` from `input` into
    /// `output`, without re-encoding.
    fn extract(
        &self,
        input: &Path,
        start_secs: u64,
        duration_secs: u32,
        output: &Path,
    ) -> Result<(), BackendError>;

    /// Join `clips` in order into `output`, without re-encoding.
    fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<(), BackendError>;
}

/// Backend driving an `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    program: PathBuf,
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG)
    }
}

impl FfmpegBackend {
    /// Use the given ffmpeg executable (a name on `PATH` or a full path).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The configured executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, args: &[OsString]) -> Result<(), BackendError> {
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| BackendError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if output.status.success() {
            return Ok(());
        }

        Err(BackendError::Failed {
            program: self.program.clone(),
            code: output.status.code(),
            stderr: stderr_tail(&String::from_utf8_lossy(&output.stderr)),
        })
    }
}

impl MediaBackend for FfmpegBackend {
    fn extract(
        &self,
        input: &Path,
        start_secs: u64,
        duration_secs: u32,
        output: &Path,
    ) -> Result<(), BackendError> {
        self.run(&extract_args(input, start_secs, duration_secs, output))
    }

    fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<(), BackendError> {
        let list_path = output.with_extension("concat.txt");
        std::fs::write(&list_path, concat_list(clips))?;
        let result = self.run(&concat_args(&list_path, output));
        let _ = std::fs::remove_file(&list_path);
        result
    }
}

/// Flags shared by every invocation. Bit-exact muxing keeps repeated
/// compilations byte-identical.
fn common_args() -> Vec<OsString> {
    ["-hide_banner", "-loglevel", "error", "-nostdin", "-y"]
        .into_iter()
        .map(OsString::from)
        .collect()
}

fn copy_args() -> Vec<OsString> {
    ["-c", "copy", "-map_metadata", "-1", "-fflags", "+bitexact"]
        .into_iter()
        .map(OsString::from)
        .collect()
}

/// Arguments for a single copy-remux clip extraction.
fn extract_args(input: &Path, start_secs: u64, duration_secs: u32, output: &Path) -> Vec<OsString> {
    let mut args = common_args();
    args.push("-i".into());
    args.push(input.as_os_str().to_owned());
    args.push("-ss".into());
    args.push(start_secs.to_string().into());
    args.push("-t".into());
    args.push(duration_secs.to_string().into());
    args.extend(copy_args());
    args.push(output.as_os_str().to_owned());
    args
}

/// Arguments for concat-demuxer joining.
fn concat_args(list: &Path, output: &Path) -> Vec<OsString> {
    let mut args = common_args();
    for arg in ["-f", "concat", "-safe", "0", "-i"] {
        args.push(arg.into());
    }
    args.push(list.as_os_str().to_owned());
    args.extend(copy_args());
    args.push(output.as_os_str().to_owned());
    args
}

/// Concat demuxer list file contents, one quoted path per line.
fn concat_list(clips: &[PathBuf]) -> String {
    clips.iter().fold(String::new(), |mut list, clip| {
        let escaped = clip.to_string_lossy().replace('\'', "'\\''");
        let _ = writeln!(list, "file '{escaped}'");
        list
    })
}

/// Keep the last few lines of diagnostic output.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
