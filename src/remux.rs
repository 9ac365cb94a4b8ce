//! Audio grafting (two-input remux).
//!
//! This module provides [`AudioGraft`] for combining the video stream of one
//! file with the audio stream of another into a new container without
//! re-encoding either. This is equivalent to
//! `ffmpeg -i video.mp4 -i original.mp4 -map 0:v -map 1:a -c copy output.mp4`
//! and is how the freshly encoded, silent cut gets the source file's audio
//! back.
//!
//! # Example
//!
//! ```no_run
//! use reframe::AudioGraft;
//!
//! // Video from the encoded cut, audio from the original source.
//! AudioGraft::new("Output.mp4", "input.mp4", "Output2.mp4")?.run()?;
//! # Ok::<(), reframe::ReframeError>(())
//! ```

use std::path::{Path, PathBuf};

use ffmpeg_next::{
    Packet, Rational, codec::Id, format::stream::Stream, media::Type,
};

use crate::error::ReframeError;

/// Index of the copied video stream in the output container.
const OUTPUT_VIDEO_STREAM: usize = 0;
/// Index of the copied audio stream in the output container.
const OUTPUT_AUDIO_STREAM: usize = 1;

/// Lossless two-input stream combiner.
///
/// Copies the best video stream from the video donor and the best audio
/// stream from the audio donor into a new output container. Packets are
/// interleaved by timestamp so the muxer never has to buffer a whole stream.
/// The output format is inferred from the file extension.
pub struct AudioGraft {
    video_path: PathBuf,
    audio_path: PathBuf,
    output_path: PathBuf,
}

impl AudioGraft {
    /// Create a new graft taking video from `video` and audio from `audio`.
    ///
    /// # Errors
    ///
    /// Returns [`ReframeError::FileOpen`] if either donor file does not
    /// exist.
    pub fn new<P1, P2, P3>(video: P1, audio: P2, output: P3) -> Result<Self, ReframeError>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
        P3: AsRef<Path>,
    {
        let video_path = video.as_ref().to_path_buf();
        let audio_path = audio.as_ref().to_path_buf();
        let output_path = output.as_ref().to_path_buf();

        ffmpeg_next::init().map_err(|e| ReframeError::FileOpen {
            path: video_path.clone(),
            reason: format!("FFmpeg initialisation failed: {e}"),
        })?;

        for path in [&video_path, &audio_path] {
            if !path.exists() {
                return Err(ReframeError::FileOpen {
                    path: path.clone(),
                    reason: "File does not exist".to_string(),
                });
            }
        }

        Ok(Self {
            video_path,
            audio_path,
            output_path,
        })
    }

    /// Execute the graft.
    ///
    /// Opens both donors, maps one video and one audio stream into the
    /// output, and copies packets with timestamp rescaling. No re-encoding
    /// is performed.
    ///
    /// # Errors
    ///
    /// - [`ReframeError::NoVideoStream`] if the video donor has no video.
    /// - [`ReframeError::NoAudioStream`] if the audio donor has no audio.
    /// - [`ReframeError::FileOpen`] if the output cannot be created.
    /// - [`ReframeError::StreamCopyError`] if packet copying fails.
    pub fn run(&self) -> Result<(), ReframeError> {
        log::info!(
            "Grafting audio from {:?} onto {:?} -> {:?}",
            self.audio_path,
            self.video_path,
            self.output_path,
        );

        let mut video_input =
            ffmpeg_next::format::input(&self.video_path).map_err(|e| ReframeError::FileOpen {
                path: self.video_path.clone(),
                reason: e.to_string(),
            })?;

        let mut audio_input =
            ffmpeg_next::format::input(&self.audio_path).map_err(|e| ReframeError::FileOpen {
                path: self.audio_path.clone(),
                reason: e.to_string(),
            })?;

        let mut output =
            ffmpeg_next::format::output(&self.output_path).map_err(|e| ReframeError::FileOpen {
                path: self.output_path.clone(),
                reason: format!("Failed to create output: {e}"),
            })?;

        // Map the donors' best streams to output streams 0 (video) and
        // 1 (audio), copying codec parameters verbatim.
        let video_stream_index = {
            let stream = video_input
                .streams()
                .best(Type::Video)
                .ok_or(ReframeError::NoVideoStream)?;
            add_copy_stream(&mut output, &stream)?;
            stream.index()
        };

        let audio_stream_index = {
            let stream = audio_input
                .streams()
                .best(Type::Audio)
                .ok_or(ReframeError::NoAudioStream)?;
            add_copy_stream(&mut output, &stream)?;
            stream.index()
        };

        output
            .write_header()
            .map_err(|e| ReframeError::StreamCopyError(format!("cannot write header: {e}")))?;

        // The muxer may have rescaled the stream time bases while writing
        // the header, so read them back now.
        let output_video_time_base = output_time_base(&output, OUTPUT_VIDEO_STREAM)?;
        let output_audio_time_base = output_time_base(&output, OUTPUT_AUDIO_STREAM)?;

        let mut video_packets = video_input.packets();
        let mut audio_packets = audio_input.packets();

        let mut pending_video = next_stream_packet(
            &mut video_packets,
            video_stream_index,
            OUTPUT_VIDEO_STREAM,
            output_video_time_base,
        );
        let mut pending_audio = next_stream_packet(
            &mut audio_packets,
            audio_stream_index,
            OUTPUT_AUDIO_STREAM,
            output_audio_time_base,
        );

        // Merge the two packet streams in timestamp order.
        while pending_video.is_some() || pending_audio.is_some() {
            let take_video = match (&pending_video, &pending_audio) {
                (Some(video), Some(audio)) => {
                    packet_seconds(video, output_video_time_base)
                        <= packet_seconds(audio, output_audio_time_base)
                }
                (Some(_), None) => true,
                (None, _) => false,
            };

            if take_video {
                if let Some(mut packet) = pending_video.take() {
                    packet.write_interleaved(&mut output).map_err(|e| {
                        ReframeError::StreamCopyError(format!("write video packet failed: {e}"))
                    })?;
                    pending_video = next_stream_packet(
                        &mut video_packets,
                        video_stream_index,
                        OUTPUT_VIDEO_STREAM,
                        output_video_time_base,
                    );
                }
            } else if let Some(mut packet) = pending_audio.take() {
                packet.write_interleaved(&mut output).map_err(|e| {
                    ReframeError::StreamCopyError(format!("write audio packet failed: {e}"))
                })?;
                pending_audio = next_stream_packet(
                    &mut audio_packets,
                    audio_stream_index,
                    OUTPUT_AUDIO_STREAM,
                    output_audio_time_base,
                );
            }
        }

        output
            .write_trailer()
            .map_err(|e| ReframeError::StreamCopyError(format!("cannot write trailer: {e}")))?;
        Ok(())
    }
}

/// Add an output stream copying `stream`'s codec parameters.
///
/// The codec tag is reset so the output muxer can pick its own.
fn add_copy_stream(
    output: &mut ffmpeg_next::format::context::Output,
    stream: &Stream<'_>,
) -> Result<(), ReframeError> {
    let mut out_stream = output
        .add_stream(ffmpeg_next::encoder::find(Id::None))
        .map_err(|e| ReframeError::StreamCopyError(format!("cannot add stream: {e}")))?;
    out_stream.set_parameters(stream.parameters());
    unsafe {
        (*out_stream.parameters().as_mut_ptr()).codec_tag = 0;
    }
    Ok(())
}

/// Read an output stream's (post-header) time base.
fn output_time_base(
    output: &ffmpeg_next::format::context::Output,
    stream_index: usize,
) -> Result<Rational, ReframeError> {
    output
        .stream(stream_index)
        .map(|stream| stream.time_base())
        .ok_or_else(|| {
            ReframeError::StreamCopyError(format!("output stream {stream_index} missing"))
        })
}

/// Pull the next packet belonging to `input_stream_index`, remapped and
/// rescaled for the output.
fn next_stream_packet<'a>(
    packets: &mut impl Iterator<Item = (Stream<'a>, Packet)>,
    input_stream_index: usize,
    output_stream_index: usize,
    output_time_base: Rational,
) -> Option<Packet> {
    for (stream, mut packet) in packets.by_ref() {
        if stream.index() != input_stream_index {
            continue;
        }
        packet.set_stream(output_stream_index);
        packet.rescale_ts(stream.time_base(), output_time_base);
        packet.set_position(-1);
        return Some(packet);
    }
    None
}

/// A packet's decode timestamp in seconds, for cross-stream ordering.
fn packet_seconds(packet: &Packet, time_base: Rational) -> f64 {
    let ts = packet.dts().or(packet.pts()).unwrap_or(0);
    ts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}
