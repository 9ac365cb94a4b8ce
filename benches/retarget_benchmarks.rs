//! Benchmarks for the per-frame retarget transform and the extraction pass.
//!
//! Run with: cargo bench
//!
//! The extraction benchmark requires fixture files from
//! `tests/fixtures/generate_fixtures.sh`; the transform benchmarks run on
//! synthetic images and need nothing on disk.

use std::path::Path;

use criterion::Criterion;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use reframe::{MediaFile, Orientation, RetargetOptions, retarget_image};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_portrait.mp4";

fn synthetic_portrait(width: u32, height: u32) -> DynamicImage {
    let buffer = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    DynamicImage::ImageRgba8(buffer)
}

fn benchmark_retarget_transform(criterion: &mut Criterion) {
    let portrait_1080p = synthetic_portrait(1080, 1920);
    let portrait_quarter = synthetic_portrait(270, 480);

    criterion.bench_function("retarget 1080x1920 (lanczos)", |bencher| {
        bencher.iter(|| {
            let _framed = retarget_image(&portrait_1080p, FilterType::Lanczos3);
        });
    });

    criterion.bench_function("retarget 1080x1920 (triangle)", |bencher| {
        bencher.iter(|| {
            let _framed = retarget_image(&portrait_1080p, FilterType::Triangle);
        });
    });

    criterion.bench_function("retarget 270x480 (lanczos)", |bencher| {
        bencher.iter(|| {
            let _framed = retarget_image(&portrait_quarter, FilterType::Lanczos3);
        });
    });
}

fn benchmark_landscape_passthrough(criterion: &mut Criterion) {
    let landscape = synthetic_portrait(1920, 1080);

    criterion.bench_function("retarget passthrough 1920x1080", |bencher| {
        bencher.iter(|| {
            let _unchanged = retarget_image(&landscape, FilterType::Lanczos3);
        });
    });
}

fn benchmark_extraction_pass(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    criterion.bench_function("extract portrait pass", |bencher| {
        bencher.iter(|| {
            let dir = tempfile::tempdir().unwrap();
            let mut media = MediaFile::open(SAMPLE_VIDEO).unwrap();
            media
                .frames()
                .extract_to_dir(dir.path(), Orientation::Portrait, &RetargetOptions::new())
                .unwrap();
        });
    });
}

criterion::criterion_group!(
    benches,
    benchmark_retarget_transform,
    benchmark_landscape_passthrough,
    benchmark_extraction_pass,
);
criterion::criterion_main!(benches);
