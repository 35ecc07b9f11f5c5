//! Image processing for the variant regeneration pipeline.
//!
//! Decode a base64 WebP payload, derive the size ladder, rasterize each
//! ladder entry onto a transparent surface, and encode the result in the
//! primary (WebP, alpha-preserving) and secondary (JPEG, white-flattened)
//! output formats.

pub mod decode;
pub mod encode;
pub mod ladder;
pub mod resize;

pub use decode::{decode_image, decode_source, payload_bytes};
pub use encode::{encode_jpeg, encode_webp};
pub use ladder::SizeLadder;
pub use resize::scale_to;
