//! Validation report tests against hand-built metadata.

use std::time::Duration;

use reframe::validation::validate;
use reframe::{AudioMetadata, MediaMetadata, VideoMetadata};

fn portrait_video() -> VideoMetadata {
    VideoMetadata {
        width: 1080,
        height: 1920,
        frames_per_second: 30.0,
        frame_count: 300,
        codec: "h264".to_string(),
    }
}

fn stereo_audio() -> AudioMetadata {
    AudioMetadata {
        sample_rate: 48_000,
        channels: 2,
        codec: "aac".to_string(),
        bit_rate: 128_000,
    }
}

fn metadata(video: Option<VideoMetadata>, audio: Option<AudioMetadata>) -> MediaMetadata {
    MediaMetadata {
        video,
        audio,
        duration: Duration::from_secs(10),
        format: "mp4".to_string(),
    }
}

#[test]
fn healthy_portrait_file_is_valid() {
    let report = validate(&metadata(Some(portrait_video()), Some(stereo_audio())));
    assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());
}

#[test]
fn missing_video_is_an_error() {
    let report = validate(&metadata(None, Some(stereo_audio())));
    assert!(!report.is_valid());
}

#[test]
fn missing_audio_is_a_warning_only() {
    let report = validate(&metadata(Some(portrait_video()), None));
    assert!(report.is_valid());
    assert!(
        report.warnings.iter().any(|w| w.contains("audio")),
        "expected an audio warning, got {:?}",
        report.warnings,
    );
}

#[test]
fn zero_dimensions_are_an_error() {
    let mut video = portrait_video();
    video.width = 0;
    let report = validate(&metadata(Some(video), Some(stereo_audio())));
    assert!(!report.is_valid());
}

#[test]
fn extreme_frame_rate_is_a_warning() {
    let mut video = portrait_video();
    video.frames_per_second = 300.0;
    let report = validate(&metadata(Some(video), Some(stereo_audio())));
    assert!(report.is_valid());
    assert!(!report.warnings.is_empty());
}

#[test]
fn landscape_source_is_noted_as_passthrough() {
    let video = VideoMetadata {
        width: 1920,
        height: 1080,
        frames_per_second: 30.0,
        frame_count: 300,
        codec: "h264".to_string(),
    };
    let report = validate(&metadata(Some(video), Some(stereo_audio())));
    assert!(report.is_valid());
    assert!(report.info.iter().any(|note| note.contains("unchanged")));
}

#[test]
fn report_display_lists_all_sections() {
    let report = validate(&metadata(None, None));
    let rendered = report.to_string();
    assert!(rendered.contains("[ERROR]"));
    assert!(rendered.contains("[WARN]"));
}
