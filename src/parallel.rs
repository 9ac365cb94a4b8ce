//! Parallel frame retargeting.
//!
//! This module runs [`retarget_image`](crate::retarget::retarget_image) over
//! a spliced frame directory as an unordered rayon map. Every frame is an
//! independent file-in/file-out job, so there is no shared mutable state
//! beyond the progress tracker.
//!
//! The public API is exposed through
//! [`RetargetJob::run`](crate::RetargetJob::run) — this module contains only
//! the internal implementation.

use std::path::Path;
use std::sync::Mutex;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::ReframeError;
use crate::options::RetargetOptions;
use crate::progress::{OperationType, ProgressTracker};
use crate::retarget::retarget_image;
use crate::sequence;

/// Retarget every frame in `input_dir` into `output_dir`, in parallel.
///
/// File names are preserved so the output directory forms the same numbered
/// sequence as the input. Returns the number of frames processed.
pub(crate) fn retarget_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: &RetargetOptions,
) -> Result<u64, ReframeError> {
    let frames = sequence::scan(input_dir)?;
    std::fs::create_dir_all(output_dir)?;

    log::info!(
        "Retargeting {} frames from {} to {}",
        frames.len(),
        input_dir.display(),
        output_dir.display(),
    );

    let tracker = Mutex::new(ProgressTracker::new(
        options.progress_callback(),
        OperationType::Retargeting,
        Some(frames.len() as u64),
        options.batch_size(),
    ));

    frames.par_iter().try_for_each(|frame| {
        if options.is_cancelled() {
            return Err(ReframeError::Cancelled);
        }

        let image = image::open(&frame.path)?;
        let retargeted = retarget_image(&image, options.filter);
        retargeted.save(output_dir.join(sequence::frame_file_name(frame.number)))?;

        if let Ok(mut tracker) = tracker.lock() {
            tracker.advance(Some(frame.number), None);
        }
        Ok(())
    })?;

    if let Ok(mut tracker) = tracker.lock() {
        tracker.finish();
    }
    Ok(frames.len() as u64)
}
