//! Core [`MediaFile`] implementation.
//!
//! `MediaFile` is the entry point for the crate. It opens a media file,
//! extracts and caches metadata, and hands out a
//! [`FrameExtractor`](crate::extract::FrameExtractor) for dumping the video's
//! frames to disk.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, format::context::Input, media::Type};

use crate::{
    error::ReframeError,
    extract::FrameExtractor,
    metadata::{AudioMetadata, MediaMetadata, VideoMetadata},
};

/// An opened media file.
///
/// Created via [`MediaFile::open`], this struct holds the demuxer context and
/// cached metadata. Use [`frames()`](MediaFile::frames) to obtain an extractor
/// for the frame-dump passes.
///
/// # Example
///
/// ```no_run
/// use reframe::MediaFile;
///
/// let media = MediaFile::open("input.mp4")?;
/// let metadata = media.metadata();
/// println!("Duration: {:?}", metadata.duration);
/// # Ok::<(), reframe::ReframeError>(())
/// ```
pub struct MediaFile {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Cached metadata extracted at open time.
    pub(crate) metadata: MediaMetadata,
    /// Index of the best video stream, if one exists.
    pub(crate) video_stream_index: Option<usize>,
    /// Index of the best audio stream, if one exists.
    pub(crate) audio_stream_index: Option<usize>,
    /// Path to the opened media file (kept for error messages).
    #[allow(dead_code)]
    pub(crate) file_path: PathBuf,
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("audio_stream_index", &self.audio_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl MediaFile {
    /// Open a media file.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best video
    /// and audio streams, and caches their metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ReframeError::FileOpen`] if the file does not exist, cannot
    /// be opened, or has no recognisable media streams.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReframeError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        if !path.exists() {
            return Err(ReframeError::FileOpen {
                path: file_path,
                reason: "File does not exist".to_string(),
            });
        }

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| ReframeError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| ReframeError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index());

        let audio_stream_index = input_context
            .streams()
            .best(Type::Audio)
            .map(|stream| stream.index());

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let format = input_context.format().name().to_string();

        let video_metadata = if let Some(index) = video_stream_index {
            let stream = input_context
                .stream(index)
                .ok_or(ReframeError::NoVideoStream)?;
            let codec_parameters = stream.parameters();
            let decoder_context =
                CodecContext::from_parameters(codec_parameters).map_err(|error| {
                    ReframeError::FileOpen {
                        path: file_path.clone(),
                        reason: format!("Failed to read video codec parameters: {error}"),
                    }
                })?;
            let video_decoder =
                decoder_context
                    .decoder()
                    .video()
                    .map_err(|error| ReframeError::FileOpen {
                        path: file_path.clone(),
                        reason: format!("Failed to create video decoder: {error}"),
                    })?;

            let width = video_decoder.width();
            let height = video_decoder.height();

            // Frames per second from the stream's average frame rate, falling
            // back to the raw rate field for streams that do not report one.
            let frame_rate = stream.avg_frame_rate();
            let frames_per_second = if frame_rate.denominator() != 0 {
                frame_rate.numerator() as f64 / frame_rate.denominator() as f64
            } else {
                let rate = stream.rate();
                if rate.denominator() != 0 {
                    rate.numerator() as f64 / rate.denominator() as f64
                } else {
                    0.0
                }
            };

            let frame_count = if frames_per_second > 0.0 {
                (duration.as_secs_f64() * frames_per_second) as u64
            } else {
                0
            };

            let codec_name = video_decoder
                .codec()
                .map(|codec| codec.name().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            Some(VideoMetadata {
                width,
                height,
                frames_per_second,
                frame_count,
                codec: codec_name,
            })
        } else {
            None
        };

        let audio_metadata = if let Some(index) = audio_stream_index {
            let stream = input_context
                .stream(index)
                .ok_or(ReframeError::NoAudioStream)?;
            let codec_parameters = stream.parameters();
            let decoder_context =
                CodecContext::from_parameters(codec_parameters).map_err(|error| {
                    ReframeError::FileOpen {
                        path: file_path.clone(),
                        reason: format!("Failed to read audio codec parameters: {error}"),
                    }
                })?;
            let audio_decoder =
                decoder_context
                    .decoder()
                    .audio()
                    .map_err(|error| ReframeError::FileOpen {
                        path: file_path.clone(),
                        reason: format!("Failed to create audio decoder: {error}"),
                    })?;

            let codec_name = audio_decoder
                .codec()
                .map(|codec| codec.name().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            Some(AudioMetadata {
                sample_rate: audio_decoder.rate(),
                channels: audio_decoder.channels(),
                codec: codec_name,
                bit_rate: audio_decoder.bit_rate() as u64,
            })
        } else {
            None
        };

        let metadata = MediaMetadata {
            video: video_metadata,
            audio: audio_metadata,
            duration,
            format,
        };

        Ok(Self {
            input_context,
            metadata,
            video_stream_index,
            audio_stream_index,
            file_path,
        })
    }

    /// Get a reference to the cached media metadata.
    ///
    /// Metadata is extracted once during [`open`](MediaFile::open) and does
    /// not require additional decoding.
    pub fn metadata(&self) -> &MediaMetadata {
        &self.metadata
    }

    /// Obtain a [`FrameExtractor`] for dumping video frames to disk.
    ///
    /// Each extraction pass consumes the demuxer from its current position, so
    /// open a fresh `MediaFile` per pass.
    pub fn frames(&mut self) -> FrameExtractor<'_> {
        FrameExtractor { media: self }
    }

    /// Validate the media file and return a report.
    ///
    /// Inspects cached metadata for issues that would affect retargeting.
    /// Does not re-read the file.
    pub fn validate(&self) -> crate::validation::ValidationReport {
        crate::validation::validate(&self.metadata)
    }
}
