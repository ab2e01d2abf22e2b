//! Progress bar utilities for highlight compilation.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::compiler::{CompileProgress, CompileStage};

/// Create a progress bar over clip extraction.
pub fn create_clip_progress(total_clips: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total_clips == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_clips as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} clips ({msg})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Reflect a compiler progress notification on the bar.
pub fn update_clip_progress(pb: Option<&ProgressBar>, progress: CompileProgress) {
    let Some(pb) = pb else {
        return;
    };
    match progress.stage {
        CompileStage::Extract => {
            pb.set_message("extracting");
            pb.set_position(progress.done as u64);
        }
        CompileStage::Concatenate => pb.set_message("joining"),
    }
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_is_none() {
        assert!(create_clip_progress(5, false).is_none());
        assert!(create_clip_progress(0, true).is_none());
    }

    #[test]
    fn test_update_moves_position() {
        let pb = ProgressBar::hidden();
        pb.set_length(3);
        update_clip_progress(
            Some(&pb),
            CompileProgress {
                stage: CompileStage::Extract,
                done: 2,
                total: 3,
            },
        );
        assert_eq!(pb.position(), 2);
    }
}
