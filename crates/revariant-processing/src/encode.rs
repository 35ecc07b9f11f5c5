//! Output format encoders.
//!
//! Every variant is produced in two formats: WebP with alpha intact
//! (on-screen/archival copies) and JPEG with alpha flattened against white
//! (print/PDF contexts). Both encode at the fixed variant quality; the
//! full-size WebP is never re-encoded — the orchestrator reuses the source
//! bytes verbatim to avoid a lossy generation.

use bytes::Bytes;
use image::{imageops, DynamicImage, Rgba, RgbaImage};

use revariant_core::constants::{MIME_JPEG, MIME_WEBP, VARIANT_QUALITY};
use revariant_core::{EncodedPayload, PipelineError, PipelineResult};

/// Encode a surface as lossy WebP, preserving the alpha channel.
pub fn encode_webp(surface: &RgbaImage) -> PipelineResult<EncodedPayload> {
    let encoder = webp::Encoder::from_rgba(surface.as_raw(), surface.width(), surface.height());
    let encoded = encoder.encode(VARIANT_QUALITY as f32);

    Ok(EncodedPayload {
        bytes: Bytes::copy_from_slice(&encoded),
        mime_type: MIME_WEBP,
        quality: VARIANT_QUALITY,
    })
}

/// Encode a surface as JPEG. JPEG carries no alpha channel, so the surface
/// is composited onto a white canvas first, matching the convention for
/// print output.
pub fn encode_jpeg(surface: &RgbaImage) -> PipelineResult<EncodedPayload> {
    let rgb = flatten_onto_white(surface);
    let (width, height) = rgb.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(VARIANT_QUALITY as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| PipelineError::EncodeFailed(e.to_string()))?;
    comp.write_scanlines(&rgb)
        .map_err(|e| PipelineError::EncodeFailed(e.to_string()))?;
    let jpeg = comp
        .finish()
        .map_err(|e| PipelineError::EncodeFailed(e.to_string()))?;

    Ok(EncodedPayload {
        bytes: Bytes::from(jpeg),
        mime_type: MIME_JPEG,
        quality: VARIANT_QUALITY,
    })
}

/// Composite a surface onto an opaque white canvas and drop the alpha
/// channel.
fn flatten_onto_white(surface: &RgbaImage) -> image::RgbImage {
    let white = Rgba([255u8, 255, 255, 255]);
    let mut canvas = RgbaImage::from_pixel(surface.width(), surface.height(), white);
    imageops::overlay(&mut canvas, surface, 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}
