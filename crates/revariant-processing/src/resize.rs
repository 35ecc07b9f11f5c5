//! Multi-resolution rasterization.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};

/// Select a smoothing filter based on how far the image is scaled down.
/// Heavy downscales tolerate a cheaper kernel; near-identity scales get
/// Lanczos for quality.
fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Scale a decoded surface so its longest edge equals `target`.
///
/// The ratio `target / longest_edge` is applied uniformly to both edges,
/// preserving aspect ratio; dimensions round to the nearest pixel with a
/// floor of 1. The surface stays RGBA throughout so alpha survives
/// downscaling. `target == longest_edge` is an identity copy, no filtering.
///
/// Caller guarantees `longest_edge > 0` (enforced when the ladder is
/// built).
pub fn scale_to(img: &DynamicImage, target: u32, longest_edge: u32) -> RgbaImage {
    let (orig_width, orig_height) = img.dimensions();

    if target == longest_edge {
        return img.to_rgba8();
    }

    let ratio = target as f32 / longest_edge as f32;
    let new_width = ((orig_width as f32 * ratio).round() as u32).max(1);
    let new_height = ((orig_height as f32 * ratio).round() as u32).max(1);

    let filter = select_filter(orig_width, orig_height, new_width, new_height);
    image::imageops::resize(&img.to_rgba8(), new_width, new_height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, px: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, px))
    }

    #[test]
    fn longest_edge_hits_target_exactly() {
        let img = solid(800, 600, Rgba([10, 20, 30, 255]));
        let scaled = scale_to(&img, 512, 800);
        assert_eq!(scaled.width(), 512);
        // 600 * 512/800 = 384
        assert_eq!(scaled.height(), 384);
    }

    #[test]
    fn portrait_orientation_scales_the_height() {
        let img = solid(600, 800, Rgba([10, 20, 30, 255]));
        let scaled = scale_to(&img, 256, 800);
        assert_eq!(scaled.height(), 256);
        assert_eq!(scaled.width(), 192);
    }

    #[test]
    fn dimensions_round_to_nearest_pixel() {
        // 333 * 128/1000 = 42.624 -> 43
        let img = solid(1000, 333, Rgba([0, 0, 0, 255]));
        let scaled = scale_to(&img, 128, 1000);
        assert_eq!(scaled.width(), 128);
        assert_eq!(scaled.height(), 43);
    }

    #[test]
    fn aspect_ratio_deviation_stays_under_rounding_error() {
        let img = solid(1920, 1080, Rgba([0, 0, 0, 255]));
        for target in [1024, 512, 256, 128] {
            let scaled = scale_to(&img, target, 1920);
            let original = 1920.0 / 1080.0;
            let produced = scaled.width() as f64 / scaled.height() as f64;
            // One pixel of rounding on the short edge bounds the drift.
            let tolerance = original / scaled.height() as f64;
            assert!((produced - original).abs() <= tolerance);
        }
    }

    #[test]
    fn identity_scale_is_a_verbatim_copy() {
        let img = solid(64, 48, Rgba([1, 2, 3, 4]));
        let scaled = scale_to(&img, 64, 64);
        assert_eq!(scaled, img.to_rgba8());
    }

    #[test]
    fn degenerate_target_never_collapses_to_zero() {
        let img = solid(4096, 2, Rgba([0, 0, 0, 255]));
        let scaled = scale_to(&img, 128, 4096);
        assert_eq!(scaled.width(), 128);
        assert_eq!(scaled.height(), 1); // 2 * 128/4096 rounds to 0, floored to 1
    }

    #[test]
    fn transparency_survives_downscaling() {
        let img = solid(512, 512, Rgba([100, 100, 100, 0]));
        let scaled = scale_to(&img, 128, 512);
        assert!(scaled.pixels().all(|p| p[3] == 0));
    }
}
