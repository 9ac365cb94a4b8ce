//! Frame extraction passes.
//!
//! This module provides [`FrameExtractor`] for dumping every frame of a video
//! stream into a directory as a numbered PNG sequence, and [`Orientation`]
//! for the per-pass transform applied before frames hit the disk.
//!
//! Frames are written in decode order as `0001.png`, `0002.png`, … — the same
//! dense 1-based numbering an `ffmpeg -i input %04d.png` invocation produces,
//! which is what [`sequence::splice`](crate::sequence::splice) relies on.

use std::path::Path;

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{
    error::ReframeError,
    media::MediaFile,
    options::RetargetOptions,
    progress::{OperationType, ProgressTracker},
    sequence,
};

/// The transform applied to each decoded frame before it is written.
///
/// The two passes over the source correspond to the two orientations the
/// final cut blends between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Frames exactly as decoded.
    Portrait,
    /// Each frame rotated 90° counterclockwise (`transpose=2` in FFmpeg
    /// filter terms).
    Landscape,
}

impl Orientation {
    fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Portrait => image,
            Orientation::Landscape => image.rotate270(),
        }
    }
}

/// Dumps a video stream to a numbered PNG sequence.
///
/// Obtained via [`MediaFile::frames`]. The extractor decodes the best video
/// stream from the demuxer's current position to the end of the file; it does
/// not seek, so use a freshly opened [`MediaFile`] for each pass.
pub struct FrameExtractor<'a> {
    pub(crate) media: &'a mut MediaFile,
}

impl FrameExtractor<'_> {
    /// Decode every frame, apply `orientation`, and write the result into
    /// `dir` as a numbered PNG sequence.
    ///
    /// The directory is created if it does not exist. Returns the number of
    /// frames written.
    ///
    /// # Errors
    ///
    /// - [`ReframeError::NoVideoStream`] if the file has no video.
    /// - [`ReframeError::VideoDecodeError`] if decoding fails.
    /// - [`ReframeError::Cancelled`] if the options' token is cancelled.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use reframe::{MediaFile, Orientation, RetargetOptions};
    ///
    /// let mut media = MediaFile::open("input.mp4")?;
    /// let options = RetargetOptions::new();
    /// let written = media
    ///     .frames()
    ///     .extract_to_dir("Portrait", Orientation::Portrait, &options)?;
    /// println!("wrote {written} frames");
    /// # Ok::<(), reframe::ReframeError>(())
    /// ```
    pub fn extract_to_dir<P: AsRef<Path>>(
        &mut self,
        dir: P,
        orientation: Orientation,
        options: &RetargetOptions,
    ) -> Result<u64, ReframeError> {
        let dir = dir.as_ref();
        let video_stream_index = self
            .media
            .video_stream_index
            .ok_or(ReframeError::NoVideoStream)?;

        let total_frames = self
            .media
            .metadata
            .video
            .as_ref()
            .map(|video| video.frame_count)
            .filter(|&count| count > 0);

        log::info!(
            "Extracting frames ({orientation:?}) to {} (estimated {} frames)",
            dir.display(),
            total_frames.unwrap_or(0),
        );

        std::fs::create_dir_all(dir)?;

        // Build a fresh decoder from the stream parameters.
        let stream = self
            .media
            .input_context
            .stream(video_stream_index)
            .ok_or(ReframeError::NoVideoStream)?;
        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let mut decoder = decoder_context.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();

        // Pixel-format converter: source format → RGB24 at native size.
        let mut scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let mut tracker = ProgressTracker::new(
            options.progress_callback(),
            OperationType::FrameExtraction,
            total_frames,
            options.batch_size(),
        );

        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();
        let mut written: u64 = 0;

        let mut save_frame = |rgb_frame: &VideoFrame,
                              written: &mut u64,
                              tracker: &mut ProgressTracker|
         -> Result<(), ReframeError> {
            if options.is_cancelled() {
                return Err(ReframeError::Cancelled);
            }
            let image = convert_frame_to_image(rgb_frame, width, height)?;
            let image = orientation.apply(image);
            *written += 1;
            image.save(dir.join(sequence::frame_file_name(*written)))?;
            tracker.advance(Some(*written), None);
            Ok(())
        };

        for (stream, packet) in self.media.input_context.packets() {
            if stream.index() != video_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                scaler.run(&decoded_frame, &mut rgb_frame)?;
                save_frame(&rgb_frame, &mut written, &mut tracker)?;
            }
        }

        // Flush the decoder.
        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            scaler.run(&decoded_frame, &mut rgb_frame)?;
            save_frame(&rgb_frame, &mut written, &mut tracker)?;
        }

        tracker.finish();
        log::info!("Extraction pass wrote {written} frames to {}", dir.display());
        Ok(written)
    }
}

/// Convert a scaled RGB24 video frame to an [`image::DynamicImage`].
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3); the
/// padding is stripped so the buffer can be handed to
/// [`image::RgbImage::from_raw`].
fn convert_frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<DynamicImage, ReframeError> {
    let stride = rgb_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = rgb_frame.data(0);

    let buffer = if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    };

    let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        ReframeError::VideoDecodeError(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(rgb_image))
}
