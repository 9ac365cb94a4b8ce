//! Error types for the `reframe` crate.
//!
//! This module defines [`ReframeError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to diagnose
//! the problem without additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `reframe` operations.
///
/// Every public method that can fail returns `Result<T, ReframeError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReframeError {
    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::MediaFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The file does not contain an audio stream.
    ///
    /// Only raised by the audio graft step; a silent input can still be
    /// extracted and retargeted.
    #[error("No audio stream found in file")]
    NoAudioStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// Video encoding failed (codec setup or frame submission).
    #[error("Video encoding error: {0}")]
    VideoEncodeError(String),

    /// The output video file could not be written.
    #[error("Video write error: {0}")]
    VideoWriteError(String),

    /// Packet-level stream copying (the audio graft) failed.
    #[error("Stream copy error: {0}")]
    StreamCopyError(String),

    /// No split frame was provided and none could be prompted for.
    #[error("A split frame is required (the first frame taken from the landscape pass)")]
    SplitFrameRequired,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while loading or saving frames.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<FfmpegError> for ReframeError {
    fn from(error: FfmpegError) -> Self {
        ReframeError::FfmpegError(error.to_string())
    }
}
