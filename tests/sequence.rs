//! Frame sequence scanning and splicing tests.
//!
//! These use temporary directories with tiny generated PNGs — no media
//! fixtures required.

use std::path::Path;

use image::{Rgba, RgbaImage};
use reframe::frame_file_name;
use reframe::sequence::{scan, splice};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn write_frame(dir: &Path, number: u64, color: Rgba<u8>) {
    RgbaImage::from_pixel(4, 4, color)
        .save(dir.join(frame_file_name(number)))
        .expect("Failed to write frame fixture");
}

fn frame_color(path: &Path) -> Rgba<u8> {
    *image::open(path)
        .expect("Failed to open frame")
        .to_rgba8()
        .get_pixel(0, 0)
}

#[test]
fn scan_sorts_numerically_and_skips_strays() {
    let dir = tempfile::tempdir().expect("tempdir");
    for number in [2, 10, 1, 10000] {
        write_frame(dir.path(), number, RED);
    }
    RgbaImage::from_pixel(4, 4, RED)
        .save(dir.path().join("cover.png"))
        .expect("Failed to write stray file");
    std::fs::write(dir.path().join("notes.txt"), "not a frame").expect("write");

    let frames = scan(dir.path()).expect("scan");
    let numbers: Vec<u64> = frames.iter().map(|frame| frame.number).collect();
    // Numeric order, not lexical: "10000.png" sorts after "0002.png".
    assert_eq!(numbers, vec![1, 2, 10, 10000]);
}

#[test]
fn splice_blends_passes_at_split_frame() {
    let portrait = tempfile::tempdir().expect("tempdir");
    let landscape = tempfile::tempdir().expect("tempdir");
    let merged = tempfile::tempdir().expect("tempdir");

    for number in 1..=4 {
        write_frame(portrait.path(), number, RED);
        write_frame(landscape.path(), number, BLUE);
    }

    let moved = splice(portrait.path(), landscape.path(), merged.path(), 3).expect("splice");
    assert_eq!(moved, 4);

    let frames = scan(merged.path()).expect("scan");
    assert_eq!(frames.len(), 4);
    assert_eq!(frame_color(&frames[0].path), RED);
    assert_eq!(frame_color(&frames[1].path), RED);
    assert_eq!(frame_color(&frames[2].path), BLUE);
    assert_eq!(frame_color(&frames[3].path), BLUE);

    // The unused halves stay behind in the pass directories.
    let leftover_portrait = scan(portrait.path()).expect("scan");
    let leftover_landscape = scan(landscape.path()).expect("scan");
    assert_eq!(
        leftover_portrait.iter().map(|f| f.number).collect::<Vec<_>>(),
        vec![3, 4],
    );
    assert_eq!(
        leftover_landscape.iter().map(|f| f.number).collect::<Vec<_>>(),
        vec![1, 2],
    );
}

#[test]
fn splice_at_one_takes_everything_from_landscape() {
    let portrait = tempfile::tempdir().expect("tempdir");
    let landscape = tempfile::tempdir().expect("tempdir");
    let merged = tempfile::tempdir().expect("tempdir");

    for number in 1..=3 {
        write_frame(portrait.path(), number, RED);
        write_frame(landscape.path(), number, BLUE);
    }

    splice(portrait.path(), landscape.path(), merged.path(), 1).expect("splice");

    let frames = scan(merged.path()).expect("scan");
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|frame| frame_color(&frame.path) == BLUE));
}

#[test]
fn splice_past_the_end_takes_everything_from_portrait() {
    let portrait = tempfile::tempdir().expect("tempdir");
    let landscape = tempfile::tempdir().expect("tempdir");
    let merged = tempfile::tempdir().expect("tempdir");

    for number in 1..=3 {
        write_frame(portrait.path(), number, RED);
        write_frame(landscape.path(), number, BLUE);
    }

    splice(portrait.path(), landscape.path(), merged.path(), 99).expect("splice");

    let frames = scan(merged.path()).expect("scan");
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|frame| frame_color(&frame.path) == RED));
}

#[test]
fn splice_creates_the_merged_directory() {
    let portrait = tempfile::tempdir().expect("tempdir");
    let landscape = tempfile::tempdir().expect("tempdir");
    let merged_root = tempfile::tempdir().expect("tempdir");
    let merged = merged_root.path().join("Input");

    write_frame(portrait.path(), 1, RED);
    write_frame(landscape.path(), 1, BLUE);

    splice(portrait.path(), landscape.path(), &merged, 2).expect("splice");
    assert!(merged.is_dir());
    assert_eq!(scan(&merged).expect("scan").len(), 1);
}
