//! Tests for the per-frame resize-and-pad transform.
//!
//! These run on synthetic images and need no media fixtures.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use reframe::retarget_image;

fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
}

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

#[test]
fn portrait_is_letterboxed_to_transposed_canvas() {
    let framed = retarget_image(&solid(100, 200, RED), FilterType::Nearest);

    // Canvas is the transposed source size.
    assert_eq!((framed.width(), framed.height()), (200, 100));

    // Scaled content is 50 wide, centered: transparent on [0, 75), content
    // on [75, 125), transparent again after.
    assert_eq!(framed.get_pixel(0, 0)[3], 0, "left padding should be transparent");
    assert_eq!(framed.get_pixel(74, 50)[3], 0);
    assert_eq!(framed.get_pixel(75, 50), RED);
    assert_eq!(framed.get_pixel(100, 99), RED);
    assert_eq!(framed.get_pixel(124, 0), RED);
    assert_eq!(framed.get_pixel(125, 0)[3], 0, "right padding should be transparent");
    assert_eq!(framed.get_pixel(199, 99)[3], 0);
}

#[test]
fn landscape_passes_through_unchanged() {
    let source = solid(200, 100, BLUE);
    let framed = retarget_image(&source, FilterType::Nearest);

    assert_eq!((framed.width(), framed.height()), (200, 100));
    assert_eq!(framed.get_pixel(0, 0), BLUE);
    assert_eq!(framed.get_pixel(199, 99), BLUE);
}

#[test]
fn square_passes_through_unchanged() {
    let framed = retarget_image(&solid(128, 128, RED), FilterType::Nearest);
    assert_eq!((framed.width(), framed.height()), (128, 128));
    assert_eq!(framed.get_pixel(64, 64), RED);
}

#[test]
fn odd_dimensions_truncate_like_integer_division() {
    // 101 × 200 → canvas 200 × 101; scaled width 101²/200 = 51 (truncated);
    // left padding (200 − 51) / 2 = 74.
    let framed = retarget_image(&solid(101, 200, RED), FilterType::Nearest);

    assert_eq!((framed.width(), framed.height()), (200, 101));
    assert_eq!(framed.get_pixel(73, 0)[3], 0);
    assert_eq!(framed.get_pixel(74, 0), RED);
    assert_eq!(framed.get_pixel(124, 100), RED);
    assert_eq!(framed.get_pixel(125, 0)[3], 0);
}

#[test]
fn tall_hd_frame_matches_landscape_pass_size() {
    // The invariant the splice depends on: a letterboxed portrait frame has
    // exactly the dimensions a rotated landscape-pass frame has.
    let portrait = solid(1080, 1920, RED);
    let framed = retarget_image(&portrait, FilterType::Triangle);
    let rotated = portrait.rotate270();

    assert_eq!(
        (framed.width(), framed.height()),
        (rotated.width(), rotated.height()),
    );
}

#[test]
fn rgb_input_produces_rgba_canvas() {
    let rgb = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(10, 20, image::Rgb([0, 255, 0])));
    let framed = retarget_image(&rgb, FilterType::Nearest);

    assert_eq!((framed.width(), framed.height()), (20, 10));
    // Padding carries an alpha channel even when the source had none.
    assert_eq!(framed.get_pixel(0, 0)[3], 0);
}
