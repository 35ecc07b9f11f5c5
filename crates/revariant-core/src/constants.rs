//! Pipeline-wide constants.

use std::time::Duration;

/// Reference list of target longest-edge sizes, descending. A source image
/// gets one variant per entry strictly smaller than its own longest edge,
/// in addition to the full-size copy.
pub const LADDER_STEPS: [u32; 4] = [1024, 512, 256, 128];

/// Quality used for every lossy re-encode, both WebP and JPEG (0-100).
pub const VARIANT_QUALITY: u8 = 75;

/// Deadline for decoding one source payload. The upstream implementation
/// waited forever on a load event that might never fire; the pipeline
/// instead fails the record with `DecodeTimeout`.
pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_secs(30);

/// Owner model recorded on every attachment created by the pipeline.
pub const ATTACHMENT_OWNER_MODEL: &str = "attachment";

pub const MIME_WEBP: &str = "image/webp";
pub const MIME_JPEG: &str = "image/jpeg";
