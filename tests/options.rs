//! RetargetOptions builder and CancellationToken tests.

use reframe::{CancellationToken, RetargetOptions, VideoCodec};

#[test]
fn options_defaults() {
    let options = RetargetOptions::new();
    let debug = format!("{options:?}");
    assert!(debug.contains("RetargetOptions"));
    assert!(debug.contains("split_frame: None"));
    assert!(debug.contains("fps: 30"));
    assert!(debug.contains("crf: Some(23)"));
    assert!(debug.contains("keep_workspace: false"));
    assert!(debug.contains("has_cancellation: false"));
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn options_with_split_frame() {
    let options = RetargetOptions::new().with_split_frame(180);
    let debug = format!("{options:?}");
    assert!(debug.contains("split_frame: Some(180)"));
}

#[test]
fn options_with_batch_size_clamps_zero() {
    let options = RetargetOptions::new().with_batch_size(0);
    let debug = format!("{options:?}");
    // Clamped to 1.
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn options_with_fps_clamps_zero() {
    let options = RetargetOptions::new().with_fps(0);
    let debug = format!("{options:?}");
    assert!(debug.contains("fps: 1"));
}

#[test]
fn options_with_codec_and_crf() {
    let options = RetargetOptions::new()
        .with_codec(VideoCodec::H265)
        .with_crf(18);
    let debug = format!("{options:?}");
    assert!(debug.contains("codec: H265"));
    assert!(debug.contains("crf: Some(18)"));
}

#[test]
fn cancellation_token_is_shared_between_clones() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn cancellation_reflects_in_options_debug() {
    let options = RetargetOptions::new().with_cancellation(CancellationToken::new());
    let debug = format!("{options:?}");
    assert!(debug.contains("has_cancellation: true"));
}
