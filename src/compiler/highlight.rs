//! Clip compilation into a single highlight.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{BackendError, MediaBackend, SourceVideo, SourceVideos};
use crate::constants::highlight::{
    DEFAULT_CLIP_DURATION_SECS, DEFAULT_MAX_PARALLEL_EXTRACTIONS, WORKSPACE_PREFIX,
};
use crate::error::{Error, Result};
use crate::events::{CameraAngle, TimestampEntry};
use crate::selection::SelectionSet;

/// Step of a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileStage {
    /// Per-entry clip extraction.
    Extract,
    /// Joining clips into the output.
    Concatenate,
}

/// Progress notification emitted while compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileProgress {
    /// Current stage.
    pub stage: CompileStage,
    /// Steps finished in this stage.
    pub done: usize,
    /// Steps in this stage.
    pub total: usize,
}

/// Compilation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Length of each clip in seconds.
    pub clip_duration_secs: u32,
    /// Clips extracted at the same time.
    pub max_parallel_extractions: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            clip_duration_secs: DEFAULT_CLIP_DURATION_SECS,
            max_parallel_extractions: DEFAULT_MAX_PARALLEL_EXTRACTIONS,
        }
    }
}

/// The concatenated highlight video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledHighlight {
    data: Vec<u8>,
    media_type: String,
    entries: Vec<TimestampEntry>,
    clip_duration_secs: u32,
}

impl CompiledHighlight {
    /// Media bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Container descriptor, same as the sources'.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Entries in clip order.
    pub fn entries(&self) -> &[TimestampEntry] {
        &self.entries
    }

    /// Length of each clip in seconds.
    pub const fn clip_duration_secs(&self) -> u32 {
        self.clip_duration_secs
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write the highlight to `path`.
    ///
    /// The bytes go to a temporary file next to `path` that is then renamed
    /// over it, so an existing file is replaced whole or left untouched.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let write_error = |source: std::io::Error| Error::HighlightWrite {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(write_error)?;

        let mut staged = NamedTempFile::new_in(parent).map_err(write_error)?;
        staged.write_all(&self.data).map_err(write_error)?;
        staged.as_file().sync_all().map_err(write_error)?;
        staged.persist(path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}

/// RAII guard marking a compilation in flight.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::CompilationInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One clip to cut.
struct ClipJob<'a> {
    index: usize,
    entry: TimestampEntry,
    input: &'a Path,
    output: PathBuf,
}

/// Turns sorted selections into a single highlight by copy-remux.
///
/// Not re-entrant: a second [`ClipCompiler::compile`] while one is running
/// fails with [`Error::CompilationInProgress`].
pub struct ClipCompiler<B> {
    backend: B,
    options: CompileOptions,
    in_flight: AtomicBool,
}

impl<B: MediaBackend> ClipCompiler<B> {
    /// Create a compiler over `backend`.
    pub fn new(backend: B, options: CompileOptions) -> Self {
        Self {
            backend,
            options,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Active settings.
    pub const fn options(&self) -> CompileOptions {
        self.options
    }

    /// Whether a compilation is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Compile `entries` (already in clip order) from `sources`.
    pub fn compile(
        &self,
        entries: &[TimestampEntry],
        sources: &SourceVideos,
    ) -> Result<CompiledHighlight> {
        self.compile_with_progress(entries, sources, &|_| {})
    }

    /// Like [`ClipCompiler::compile`], reporting progress after each step.
    pub fn compile_with_progress(
        &self,
        entries: &[TimestampEntry],
        sources: &SourceVideos,
        progress: &(dyn Fn(CompileProgress) + Sync),
    ) -> Result<CompiledHighlight> {
        if entries.is_empty() {
            return Err(Error::EmptySelection);
        }

        let _guard = InFlight::acquire(&self.in_flight)?;

        let used = resolve_sources(entries, sources)?;
        let first = used.values().next().ok_or(Error::EmptySelection)?;
        let media_type = first.media_type().to_string();
        let ext = first.extension()?;

        info!(
            "Compiling {} clip(s) of {}s from {} source(s)",
            entries.len(),
            self.options.clip_duration_secs,
            used.len()
        );

        // Scratch files live only for this call.
        let workspace = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()?;

        let mut inputs: BTreeMap<CameraAngle, PathBuf> = BTreeMap::new();
        for (angle, source) in &used {
            let path = workspace.path().join(format!("source-{angle}.{ext}"));
            std::fs::write(&path, source.data())?;
            inputs.insert(*angle, path);
        }

        let mut jobs = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let input = inputs
                .get(&entry.angle)
                .ok_or(Error::MissingCameraAngle { angle: entry.angle })?;
            jobs.push(ClipJob {
                index,
                entry: *entry,
                input,
                output: workspace.path().join(format!("clip-{index:03}.{ext}")),
            });
        }

        self.extract_all(&jobs, progress)?;

        let clips: Vec<PathBuf> = jobs.iter().map(|job| job.output.clone()).collect();
        let output = workspace.path().join(format!("highlight.{ext}"));
        progress(CompileProgress {
            stage: CompileStage::Concatenate,
            done: 0,
            total: 1,
        });
        self.backend
            .concat(&clips, &output)
            .map_err(|source| Error::ConcatenationFailed { source })?;
        let data = std::fs::read(&output).map_err(|e| Error::ConcatenationFailed {
            source: BackendError::Io(e),
        })?;
        progress(CompileProgress {
            stage: CompileStage::Concatenate,
            done: 1,
            total: 1,
        });

        info!("Compiled highlight of {} bytes", data.len());

        Ok(CompiledHighlight {
            data,
            media_type,
            entries: entries.to_vec(),
            clip_duration_secs: self.options.clip_duration_secs,
        })
    }

    /// Cut every clip, a batch of workers at a time. Fails with the first
    /// error in clip order.
    fn extract_all(
        &self,
        jobs: &[ClipJob<'_>],
        progress: &(dyn Fn(CompileProgress) + Sync),
    ) -> Result<()> {
        let total = jobs.len();
        let width = self.options.max_parallel_extractions.max(1);
        let duration = self.options.clip_duration_secs;
        let mut done = 0;

        progress(CompileProgress {
            stage: CompileStage::Extract,
            done,
            total,
        });

        for batch in jobs.chunks(width) {
            let results: Vec<std::result::Result<(), BackendError>> = std::thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .map(|job| {
                        scope.spawn(move || {
                            debug!("Extracting clip {} at {}", job.index, job.entry);
                            self.backend.extract(
                                job.input,
                                job.entry.timestamp.to_seconds(),
                                duration,
                                &job.output,
                            )
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| {
                        handle.join().unwrap_or_else(|_| {
                            Err(BackendError::Io(std::io::Error::other(
                                "extraction worker panicked",
                            )))
                        })
                    })
                    .collect()
            });

            for (job, result) in batch.iter().zip(results) {
                if let Err(source) = result {
                    warn!("Clip {} at {} failed: {source}", job.index, job.entry);
                    return Err(Error::ExtractionFailed {
                        index: job.index,
                        entry: job.entry,
                        source,
                    });
                }
                done += 1;
                progress(CompileProgress {
                    stage: CompileStage::Extract,
                    done,
                    total,
                });
            }
        }

        Ok(())
    }
}

/// Resolve every referenced angle, rejecting missing angles and sources
/// that cannot be joined by copy-remux.
fn resolve_sources<'a>(
    entries: &[TimestampEntry],
    sources: &'a SourceVideos,
) -> Result<BTreeMap<CameraAngle, &'a SourceVideo>> {
    let mut used = BTreeMap::new();
    for entry in entries {
        if !used.contains_key(&entry.angle) {
            used.insert(entry.angle, sources.resolve(entry.angle)?);
        }
    }

    let mut media_types = used.values().map(|s| s.media_type());
    if let Some(first) = media_types.next()
        && let Some(other) = media_types.find(|m| !m.eq_ignore_ascii_case(first))
    {
        return Err(Error::IncompatibleSources {
            first: first.to_string(),
            second: other.to_string(),
        });
    }

    Ok(used)
}

/// Export workflow state: sources, selection and the latest highlight.
pub struct HighlightSession<B> {
    compiler: ClipCompiler<B>,
    sources: Option<SourceVideos>,
    selection: SelectionSet,
    highlight: Option<CompiledHighlight>,
}

impl<B: MediaBackend> HighlightSession<B> {
    /// Start a session without sources.
    pub fn new(compiler: ClipCompiler<B>) -> Self {
        Self {
            compiler,
            sources: None,
            selection: SelectionSet::new(),
            highlight: None,
        }
    }

    /// Install freshly uploaded sources, releasing previous buffers, the
    /// selection and any highlight made from them.
    pub fn replace_sources(&mut self, sources: SourceVideos) {
        self.release_sources();
        self.sources = Some(sources);
    }

    /// Drop the sources and everything derived from them.
    pub fn release_sources(&mut self) {
        self.sources = None;
        self.close();
    }

    /// Current sources.
    pub const fn sources(&self) -> Option<&SourceVideos> {
        self.sources.as_ref()
    }

    /// Toggle an entry in the selection.
    pub fn toggle(&mut self, entry: TimestampEntry) -> bool {
        self.selection.toggle(entry)
    }

    /// Current selection.
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Latest successfully compiled highlight.
    pub const fn highlight(&self) -> Option<&CompiledHighlight> {
        self.highlight.as_ref()
    }

    /// Compile the current selection in time order.
    ///
    /// On success the new highlight replaces the previous one; on failure the
    /// previous highlight is kept.
    pub fn regenerate(&mut self) -> Result<&CompiledHighlight> {
        if self.selection.is_empty() {
            return Err(Error::EmptySelection);
        }
        let sources = self.sources.as_ref().ok_or(Error::MissingCameraAngle {
            angle: CameraAngle::One,
        })?;
        let sorted = self.selection.sorted_by_time();
        let highlight = self.compiler.compile(&sorted, sources)?;
        Ok(self.highlight.insert(highlight))
    }

    /// Abandon the export: clear the selection and release the highlight.
    pub fn close(&mut self) {
        self.selection.clear();
        self.highlight = None;
    }
}
