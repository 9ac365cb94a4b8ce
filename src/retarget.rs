//! The per-frame resize-and-pad transform.
//!
//! Every spliced frame passes through [`retarget_image`]: portrait frames are
//! uniformly scaled down and letterboxed onto a transparent canvas with their
//! own *transposed* dimensions, so they come out at exactly the size the
//! landscape-pass frames already have. Landscape and square frames pass
//! through untouched.
//!
//! The transform is stateless and per-image, which is what lets the pipeline
//! run it as an unordered parallel map over the spliced directory.

use image::{DynamicImage, Rgba, RgbaImage, imageops, imageops::FilterType};

/// Letterbox a portrait image onto a landscape canvas of its transposed size.
///
/// For an input of `width × height` with `height > width`:
///
/// - the canvas is `height × width` (transposed), fully transparent;
/// - the image is scaled by `width / height` so its height fills the canvas
///   (scaled width truncates to `width² / height`);
/// - the scaled image is pasted horizontally centered at the top edge.
///
/// Anything square or landscape is returned unchanged. The transparent
/// padding becomes black once the frame is encoded to yuv420p, which is the
/// intended letterbox look.
///
/// # Example
///
/// ```
/// use image::{DynamicImage, RgbaImage};
/// use image::imageops::FilterType;
/// use reframe::retarget_image;
///
/// let portrait = DynamicImage::ImageRgba8(RgbaImage::new(100, 200));
/// let framed = retarget_image(&portrait, FilterType::Nearest);
/// assert_eq!((framed.width(), framed.height()), (200, 100));
/// ```
pub fn retarget_image(image: &DynamicImage, filter: FilterType) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if height <= width {
        return image.clone();
    }

    let (canvas_width, canvas_height) = (height, width);
    let scaled_width = scaled_width(width, height);
    let scaled = image.resize_exact(scaled_width, canvas_height, filter);

    let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 0]));
    imageops::overlay(&mut canvas, &scaled, left_padding(canvas_width, scaled_width), 0);
    DynamicImage::ImageRgba8(canvas)
}

/// Width of a portrait image after uniform scaling by `width / height`.
fn scaled_width(width: u32, height: u32) -> u32 {
    ((width as f64) * (width as f64 / height as f64)) as u32
}

/// Horizontal offset that centers a scaled image on the canvas.
fn left_padding(canvas_width: u32, scaled_width: u32) -> i64 {
    ((canvas_width - scaled_width) / 2) as i64
}

#[cfg(test)]
mod tests {
    use super::{left_padding, scaled_width};

    #[test]
    fn scaled_width_truncates() {
        // 101 × 200 → 101 * 101 / 200 = 51.005 → 51
        assert_eq!(scaled_width(101, 200), 51);
        assert_eq!(scaled_width(100, 200), 50);
        assert_eq!(scaled_width(1080, 1920), 607);
    }

    #[test]
    fn padding_centers() {
        assert_eq!(left_padding(200, 50), 75);
        assert_eq!(left_padding(200, 51), 74);
        assert_eq!(left_padding(50, 50), 0);
    }
}
