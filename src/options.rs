//! Retargeting configuration.
//!
//! [`RetargetOptions`] is a builder that threads the split frame, encoder
//! settings, progress callbacks, and cancellation tokens through the pipeline
//! without polluting every function signature.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reframe::{CancellationToken, ProgressCallback, ProgressInfo, RetargetOptions};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = RetargetOptions::new()
//!     .with_split_frame(180)
//!     .with_fps(30)
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::sync::Arc;

use image::imageops::FilterType;

use crate::encode::VideoCodec;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Configuration for a retargeting run.
///
/// All fields have defaults matching the tool's stock behavior: 30 fps H.264
/// output at CRF 23, Lanczos resampling, work directories removed on success.
/// The split frame has no default — the CLI prompts for it when absent, and
/// [`RetargetJob::run`](crate::RetargetJob::run) fails without one.
#[derive(Clone)]
pub struct RetargetOptions {
    /// First frame number taken from the landscape pass.
    pub(crate) split_frame: Option<u64>,
    /// Output frame rate.
    pub(crate) fps: u32,
    /// Output video codec.
    pub(crate) codec: VideoCodec,
    /// Constant Rate Factor for the encoder.
    pub(crate) crf: Option<u32>,
    /// Resampling filter for the letterbox scale.
    pub(crate) filter: FilterType,
    /// Final output path. `None` uses `Output2.mp4` next to the input.
    pub(crate) output_path: Option<PathBuf>,
    /// Keep the work directories and intermediate video on disk.
    pub(crate) keep_workspace: bool,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N items).
    pub(crate) batch_size: u64,
}

impl Debug for RetargetOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RetargetOptions")
            .field("split_frame", &self.split_frame)
            .field("fps", &self.fps)
            .field("codec", &self.codec)
            .field("crf", &self.crf)
            .field("keep_workspace", &self.keep_workspace)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for RetargetOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RetargetOptions {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self {
            split_frame: None,
            fps: 30,
            codec: VideoCodec::H264,
            crf: Some(23),
            filter: FilterType::Lanczos3,
            output_path: None,
            keep_workspace: false,
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }

    /// Set the first frame number taken from the landscape pass.
    ///
    /// Frames below this number come from the portrait pass. 0 or 1 takes
    /// everything from the landscape pass.
    #[must_use]
    pub fn with_split_frame(mut self, split_frame: u64) -> Self {
        self.split_frame = Some(split_frame);
        self
    }

    /// Set the output frame rate. Defaults to 30.
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    /// Set the output video codec. Defaults to H.264.
    #[must_use]
    pub fn with_codec(mut self, codec: VideoCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Set the encoder's Constant Rate Factor (0–51, lower is better).
    /// Defaults to 23.
    #[must_use]
    pub fn with_crf(mut self, crf: u32) -> Self {
        self.crf = Some(crf);
        self
    }

    /// Set the resampling filter used when scaling portrait frames.
    /// Defaults to Lanczos.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Override the final output path.
    ///
    /// Defaults to `Output2.mp4` next to the input file.
    #[must_use]
    pub fn with_output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Keep the work directories and the intermediate video instead of
    /// deleting them after a successful run.
    #[must_use]
    pub fn with_keep_workspace(mut self, keep: bool) -> Self {
        self.keep_workspace = keep;
        self
    }

    /// Attach a progress callback.
    ///
    /// The callback is invoked every
    /// [`batch_size`](RetargetOptions::with_batch_size) items during each
    /// pipeline step.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled, the current step stops and returns
    /// [`ReframeError::Cancelled`](crate::ReframeError::Cancelled).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every item; 10 means every 10th item. Clamped to a
    /// minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub(crate) fn progress_callback(&self) -> Arc<dyn ProgressCallback> {
        self.progress.clone()
    }

    pub(crate) fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
