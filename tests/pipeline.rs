//! End-to-end pipeline tests.
//!
//! The full-run tests require fixture files from
//! `tests/fixtures/generate_fixtures.sh` and are skipped when the fixtures
//! are absent; the error-path tests always run.

use std::path::{Path, PathBuf};

use reframe::{MediaFile, ReframeError, RetargetJob, RetargetOptions};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_portrait.mp4";

/// Copy the fixture into its own directory so the pipeline's work
/// directories (siblings of the input) cannot collide across tests.
fn staged_fixture(workdir: &Path) -> PathBuf {
    let staged = workdir.join("input.mp4");
    std::fs::copy(SAMPLE_VIDEO, &staged).expect("Failed to stage fixture");
    staged
}

#[test]
fn run_without_split_frame_fails_fast() {
    let result = RetargetJob::new("whatever.mp4", RetargetOptions::new()).run();
    assert!(matches!(result, Err(ReframeError::SplitFrameRequired)));
}

#[test]
fn run_on_missing_input_fails_to_open() {
    let options = RetargetOptions::new().with_split_frame(5);
    let result = RetargetJob::new("does_not_exist.mp4", options).run();
    assert!(matches!(result, Err(ReframeError::FileOpen { .. })));
}

#[test]
fn full_run_produces_a_landscape_video_with_audio() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let workdir = tempfile::tempdir().expect("tempdir");
    let input = staged_fixture(workdir.path());
    let output = workdir.path().join("final.mp4");

    let options = RetargetOptions::new()
        .with_split_frame(2)
        .with_output_path(&output);
    let outcome = RetargetJob::new(&input, options).run().expect("pipeline run");

    assert_eq!(outcome.output_path, output);
    assert!(output.exists());
    assert!(outcome.frame_count > 0);

    // The fixture is 64×128 portrait, so the cut comes out 128×64.
    let media = MediaFile::open(&output).expect("open output");
    let metadata = media.metadata();
    let video = metadata.video.as_ref().expect("output has video");
    assert_eq!((video.width, video.height), (128, 64));
    assert!(metadata.audio.is_some(), "audio should be grafted back on");

    // Work directories and the silent intermediate are cleaned up.
    for leftover in ["Portrait", "Landscape", "Input", "Output", "Output.mp4"] {
        assert!(
            !workdir.path().join(leftover).exists(),
            "{leftover} should have been removed",
        );
    }
}

#[test]
fn keep_workspace_leaves_the_passes_on_disk() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let workdir = tempfile::tempdir().expect("tempdir");
    let input = staged_fixture(workdir.path());

    let options = RetargetOptions::new()
        .with_split_frame(2)
        .with_keep_workspace(true);
    RetargetJob::new(&input, options).run().expect("pipeline run");

    assert!(workdir.path().join("Portrait").is_dir());
    assert!(workdir.path().join("Landscape").is_dir());
    assert!(workdir.path().join("Output.mp4").exists());
    assert!(workdir.path().join("Output2.mp4").exists());
}

#[test]
fn both_passes_write_the_same_frame_count() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    use reframe::{Orientation, sequence};

    let workdir = tempfile::tempdir().expect("tempdir");
    let portrait_dir = workdir.path().join("portrait");
    let landscape_dir = workdir.path().join("landscape");
    let options = RetargetOptions::new();

    let mut media = MediaFile::open(SAMPLE_VIDEO).expect("open fixture");
    let portrait = media
        .frames()
        .extract_to_dir(&portrait_dir, Orientation::Portrait, &options)
        .expect("portrait pass");

    let mut media = MediaFile::open(SAMPLE_VIDEO).expect("open fixture");
    let landscape = media
        .frames()
        .extract_to_dir(&landscape_dir, Orientation::Landscape, &options)
        .expect("landscape pass");

    assert_eq!(portrait, landscape);
    assert_eq!(sequence::scan(&portrait_dir).expect("scan").len() as u64, portrait);

    // The rotated pass swaps dimensions.
    let first_portrait = image::open(portrait_dir.join("0001.png")).expect("open frame");
    let first_landscape = image::open(landscape_dir.join("0001.png")).expect("open frame");
    assert_eq!(first_portrait.width(), first_landscape.height());
    assert_eq!(first_portrait.height(), first_landscape.width());
}

#[test]
fn cancelled_token_stops_the_run() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    use reframe::CancellationToken;

    let workdir = tempfile::tempdir().expect("tempdir");
    let input = staged_fixture(workdir.path());

    let token = CancellationToken::new();
    token.cancel();

    let options = RetargetOptions::new()
        .with_split_frame(2)
        .with_cancellation(token);
    let result = RetargetJob::new(&input, options).run();
    assert!(matches!(result, Err(ReframeError::Cancelled)));
}
