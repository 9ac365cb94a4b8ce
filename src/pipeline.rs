//! The end-to-end retargeting pipeline.
//!
//! [`RetargetJob`] strings the individual steps together: two extraction
//! passes, the splice, the parallel retarget map, the encode, the audio
//! graft, and finally workspace cleanup. Work directories live next to the
//! input file (`Portrait/`, `Landscape/`, `Input/`, `Output/`), with the
//! silent intermediate cut at `Output.mp4` and the final result at
//! `Output2.mp4` unless an output path override is set.
//!
//! # Example
//!
//! ```no_run
//! use reframe::{RetargetJob, RetargetOptions};
//!
//! let options = RetargetOptions::new().with_split_frame(180);
//! let outcome = RetargetJob::new("input.mp4", options).run()?;
//! println!(
//!     "wrote {} ({} frames, retargeted in {:?})",
//!     outcome.output_path.display(),
//!     outcome.frame_count,
//!     outcome.retarget_elapsed,
//! );
//! # Ok::<(), reframe::ReframeError>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::{
    encode::{VideoEncoder, VideoEncoderOptions},
    error::ReframeError,
    extract::Orientation,
    media::MediaFile,
    options::RetargetOptions,
    parallel,
    progress::{OperationType, ProgressTracker},
    remux::AudioGraft,
    sequence,
};

/// Name of the directory holding the unrotated extraction pass.
const PORTRAIT_DIR: &str = "Portrait";
/// Name of the directory holding the rotated extraction pass.
const LANDSCAPE_DIR: &str = "Landscape";
/// Name of the directory holding the spliced sequence.
const MERGED_DIR: &str = "Input";
/// Name of the directory holding the retargeted frames.
const RETARGETED_DIR: &str = "Output";
/// Name of the silent intermediate cut.
const INTERMEDIATE_FILE: &str = "Output.mp4";
/// Default name of the final output.
const DEFAULT_OUTPUT_FILE: &str = "Output2.mp4";

/// What a completed run produced.
#[derive(Debug, Clone)]
#[must_use]
pub struct RetargetOutcome {
    /// Path of the final video, with audio grafted in.
    pub output_path: PathBuf,
    /// Number of frames in the final cut.
    pub frame_count: u64,
    /// Wall-clock time the parallel retarget pass took.
    pub retarget_elapsed: Duration,
}

/// A configured retargeting run over one input file.
#[derive(Debug)]
pub struct RetargetJob {
    input_path: PathBuf,
    options: RetargetOptions,
}

impl RetargetJob {
    /// Create a job for `input` with the given options.
    pub fn new<P: Into<PathBuf>>(input: P, options: RetargetOptions) -> Self {
        Self {
            input_path: input.into(),
            options,
        }
    }

    /// The options this job will run with.
    pub fn options(&self) -> &RetargetOptions {
        &self.options
    }

    /// Run the pipeline to completion.
    ///
    /// # Errors
    ///
    /// - [`ReframeError::SplitFrameRequired`] if no split frame was set.
    /// - [`ReframeError::FileOpen`] if the input does not exist or cannot be
    ///   read.
    /// - [`ReframeError::NoVideoStream`] if the input has no video.
    /// - [`ReframeError::NoAudioStream`] if the input has no audio to graft.
    /// - [`ReframeError::Cancelled`] if the token is cancelled mid-run; the
    ///   workspace is left behind for inspection in that case.
    pub fn run(&self) -> Result<RetargetOutcome, ReframeError> {
        let split_frame = self
            .options
            .split_frame
            .ok_or(ReframeError::SplitFrameRequired)?;

        let parent = work_root(&self.input_path);
        let portrait_dir = parent.join(PORTRAIT_DIR);
        let landscape_dir = parent.join(LANDSCAPE_DIR);
        let merged_dir = parent.join(MERGED_DIR);
        let retargeted_dir = parent.join(RETARGETED_DIR);
        let intermediate_path = parent.join(INTERMEDIATE_FILE);
        let output_path = self
            .options
            .output_path
            .clone()
            .unwrap_or_else(|| parent.join(DEFAULT_OUTPUT_FILE));

        log::info!(
            "Retargeting {:?} (split at frame {split_frame}) -> {:?}",
            self.input_path,
            output_path,
        );

        // Each extraction pass decodes the file front to back, so each gets
        // its own freshly opened demuxer.
        let mut media = MediaFile::open(&self.input_path)?;
        if media.metadata().video.is_none() {
            return Err(ReframeError::NoVideoStream);
        }
        let portrait_frames =
            media
                .frames()
                .extract_to_dir(&portrait_dir, Orientation::Portrait, &self.options)?;

        let mut media = MediaFile::open(&self.input_path)?;
        let landscape_frames =
            media
                .frames()
                .extract_to_dir(&landscape_dir, Orientation::Landscape, &self.options)?;

        if portrait_frames != landscape_frames {
            log::warn!(
                "Extraction passes disagree on frame count ({portrait_frames} vs {landscape_frames})",
            );
        }

        sequence::splice(&portrait_dir, &landscape_dir, &merged_dir, split_frame)?;

        let retarget_started = Instant::now();
        let frame_count =
            parallel::retarget_directory(&merged_dir, &retargeted_dir, &self.options)?;
        let retarget_elapsed = retarget_started.elapsed();
        log::info!(
            "Retargeted {frame_count} frames in {:.2}s",
            retarget_elapsed.as_secs_f64(),
        );

        self.encode(&retargeted_dir, &intermediate_path)?;

        let mut remux_tracker = ProgressTracker::new(
            self.options.progress_callback(),
            OperationType::Remuxing,
            None,
            self.options.batch_size(),
        );
        AudioGraft::new(&intermediate_path, &self.input_path, &output_path)?.run()?;
        remux_tracker.finish();

        if self.options.keep_workspace {
            log::info!("Keeping work directories under {}", parent.display());
        } else {
            cleanup_workspace(
                &[&portrait_dir, &landscape_dir, &merged_dir, &retargeted_dir],
                &intermediate_path,
            )?;
        }

        Ok(RetargetOutcome {
            output_path,
            frame_count,
            retarget_elapsed,
        })
    }

    /// Encode the retargeted sequence into the silent intermediate cut.
    fn encode(&self, retargeted_dir: &Path, intermediate_path: &Path) -> Result<(), ReframeError> {
        let frames = sequence::scan(retargeted_dir)?;
        let mut tracker = ProgressTracker::new(
            self.options.progress_callback(),
            OperationType::Encoding,
            Some(frames.len() as u64),
            self.options.batch_size(),
        );

        let images = frames.iter().map(|frame| {
            if self.options.is_cancelled() {
                return Err(ReframeError::Cancelled);
            }
            let image = image::open(&frame.path)?;
            tracker.advance(Some(frame.number), None);
            Ok(image)
        });

        let mut encoder_options = VideoEncoderOptions::default()
            .fps(self.options.fps)
            .codec(self.options.codec);
        if let Some(crf) = self.options.crf {
            encoder_options = encoder_options.crf(crf);
        }

        VideoEncoder::new(encoder_options).write(intermediate_path, images)?;
        tracker.finish();
        Ok(())
    }
}

/// The directory the work directories and outputs live in.
///
/// Siblings of the input file; the current directory for bare file names.
fn work_root(input_path: &Path) -> PathBuf {
    match input_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Delete the work directories and the silent intermediate cut.
fn cleanup_workspace(directories: &[&Path], intermediate: &Path) -> Result<(), ReframeError> {
    log::info!("Deleting temporary files");
    for directory in directories {
        if directory.exists() {
            std::fs::remove_dir_all(directory)?;
        }
    }
    if intermediate.exists() {
        std::fs::remove_file(intermediate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::work_root;

    #[test]
    fn work_root_of_bare_file_name() {
        assert_eq!(work_root(Path::new("input.mp4")), Path::new("."));
    }

    #[test]
    fn work_root_of_nested_path() {
        assert_eq!(
            work_root(Path::new("/videos/clip/input.mp4")),
            Path::new("/videos/clip"),
        );
    }
}
