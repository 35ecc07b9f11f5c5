use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AttachmentId = Uuid;

/// One product record as returned by the record source. The `image` field
/// is the original payload, base64-encoded WebP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: Uuid,
    pub name: String,
    pub image: String,
}

impl SourceRecord {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// An encoded raster variant ready for persistence.
#[derive(Debug, Clone)]
pub struct EncodedPayload {
    pub bytes: Bytes,
    pub mime_type: &'static str,
    pub quality: u8,
}

/// A pending attachment, handed to the attachment store for creation.
///
/// `linked_to` is `None` only for the very first (full-size, primary
/// format) attachment of a record; every smaller size links back to that
/// reference id, and every secondary-format copy links to the primary
/// created at the same size.
#[derive(Debug, Clone)]
pub struct AttachmentDraft {
    pub name: String,
    pub description: String,
    pub payload: Bytes,
    pub linked_to: Option<AttachmentId>,
    pub owner_model: String,
    pub mime_type: String,
}

/// Adapt a primary-format filename to the secondary format's conventional
/// extension. Names without the `.webp` suffix pass through unchanged.
pub fn jpeg_filename(name: &str) -> String {
    match name.strip_suffix(".webp") {
        Some(stem) => format!("{stem}.jpg"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_image_rejects_empty_payload() {
        let record = SourceRecord {
            id: Uuid::new_v4(),
            name: "chair".to_string(),
            image: String::new(),
        };
        assert!(!record.has_image());

        let record = SourceRecord {
            image: "aGVsbG8=".to_string(),
            ..record
        };
        assert!(record.has_image());
    }

    #[test]
    fn jpeg_filename_swaps_webp_suffix() {
        assert_eq!(jpeg_filename("chair.webp"), "chair.jpg");
        assert_eq!(jpeg_filename("chair.png"), "chair.png");
        assert_eq!(jpeg_filename("chair"), "chair");
        // Only a trailing suffix is rewritten.
        assert_eq!(jpeg_filename("a.webp.webp"), "a.webp.jpg");
    }
}
