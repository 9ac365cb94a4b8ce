//! # reframe
//!
//! Retarget a video into a blended portrait/landscape cut.
//!
//! `reframe` takes a single video file, dumps its frames twice — once as-is
//! ("portrait pass") and once rotated 90° counterclockwise ("landscape
//! pass") — splices the two sequences at a chosen frame, letterboxes every
//! portrait frame onto a landscape canvas of its transposed size, re-encodes
//! the result, and grafts the original audio back on without re-encoding it.
//! Media decoding and encoding are powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; the per-frame
//! geometry runs on [`image`](https://crates.io/crates/image) buffers across
//! a [`rayon`](https://crates.io/crates/rayon) thread pool.
//!
//! ## Quick Start
//!
//! ### Run the whole pipeline
//!
//! ```no_run
//! use reframe::{RetargetJob, RetargetOptions};
//!
//! let options = RetargetOptions::new().with_split_frame(180);
//! let outcome = RetargetJob::new("input.mp4", options).run().unwrap();
//! println!("wrote {}", outcome.output_path.display());
//! ```
//!
//! ### Dump a single extraction pass
//!
//! ```no_run
//! use reframe::{MediaFile, Orientation, RetargetOptions};
//!
//! let mut media = MediaFile::open("input.mp4").unwrap();
//! let options = RetargetOptions::new();
//! media
//!     .frames()
//!     .extract_to_dir("frames", Orientation::Landscape, &options)
//!     .unwrap();
//! ```
//!
//! ### Letterbox one image
//!
//! ```
//! use image::{DynamicImage, RgbaImage};
//! use image::imageops::FilterType;
//! use reframe::retarget_image;
//!
//! let portrait = DynamicImage::ImageRgba8(RgbaImage::new(1080, 1920));
//! let framed = retarget_image(&portrait, FilterType::Lanczos3);
//! assert_eq!((framed.width(), framed.height()), (1920, 1080));
//! ```
//!
//! ## Pipeline shape
//!
//! The pipeline is deliberately a straight line: extract → extract →
//! splice → parallel map → encode → remux → cleanup. There is no scheduler,
//! no persistent state, and no retry machinery — each step either succeeds
//! or the run stops with a [`ReframeError`]. The only concurrency is the
//! unordered rayon map in the retarget pass, where every frame is an
//! independent file-in/file-out job.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system. See the
//! README for platform-specific instructions.

pub mod encode;
pub mod error;
pub mod extract;
pub mod ffmpeg;
pub mod media;
pub mod metadata;
pub mod options;
mod parallel;
pub mod pipeline;
pub mod progress;
pub mod remux;
pub mod retarget;
pub mod sequence;
pub mod validation;

pub use encode::{VideoCodec, VideoEncoder, VideoEncoderOptions};
pub use error::ReframeError;
pub use extract::{FrameExtractor, Orientation};
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use media::MediaFile;
pub use metadata::{AudioMetadata, MediaMetadata, VideoMetadata};
pub use options::RetargetOptions;
pub use pipeline::{RetargetJob, RetargetOutcome};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use remux::AudioGraft;
pub use retarget::retarget_image;
pub use sequence::{FrameFile, frame_file_name};
pub use validation::ValidationReport;
