//! Pipeline error taxonomy.
//!
//! The upstream implementation had no explicit failure handling: a decode
//! that never completed hung the batch, a zero-dimension image produced
//! NaN-sized surfaces, and any rejected persistence call aborted the run
//! with no report. Each of those implicit behaviors becomes an explicit
//! variant here so the orchestrator can decide per record whether to skip
//! or abort.

use thiserror::Error;

/// Errors produced while regenerating image variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source payload did not decode within the configured deadline.
    #[error("image decode timed out after {seconds}s")]
    DecodeTimeout { seconds: u64 },

    /// The source payload is not valid base64 or not a decodable image.
    #[error("failed to decode source image: {0}")]
    DecodeFailed(String),

    /// The decoded surface has a zero edge, so no scale ratio exists.
    #[error("image has invalid dimensions {width}x{height}")]
    InvalidImageDimensions { width: u32, height: u32 },

    /// A scaled surface could not be encoded into an output format.
    #[error("failed to encode variant: {0}")]
    EncodeFailed(String),

    /// A gateway call (attachment store, record source, report sink) failed.
    #[error("persistence call failed: {0}")]
    Persistence(String),
}

impl PipelineError {
    /// Whether the error is confined to one record. Record-scoped failures
    /// are logged into the report and the batch continues; everything else
    /// aborts the run.
    pub fn is_record_scoped(&self) -> bool {
        !matches!(self, PipelineError::Persistence(_))
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_errors_abort_the_batch() {
        assert!(!PipelineError::Persistence("boom".into()).is_record_scoped());
    }

    #[test]
    fn decode_and_dimension_errors_are_record_scoped() {
        assert!(PipelineError::DecodeTimeout { seconds: 30 }.is_record_scoped());
        assert!(PipelineError::DecodeFailed("bad".into()).is_record_scoped());
        assert!(PipelineError::InvalidImageDimensions {
            width: 0,
            height: 0
        }
        .is_record_scoped());
    }

    #[test]
    fn display_includes_context() {
        let err = PipelineError::DecodeTimeout { seconds: 30 };
        assert!(err.to_string().contains("30s"));

        let err = PipelineError::InvalidImageDimensions {
            width: 0,
            height: 128,
        };
        assert!(err.to_string().contains("0x128"));
    }
}
