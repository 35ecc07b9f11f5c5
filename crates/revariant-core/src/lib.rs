//! Core domain types for the image variant regeneration pipeline.
//!
//! This crate holds the data model shared by every other crate: source
//! records, encoded payloads, attachment drafts, the report log, and the
//! pipeline error taxonomy. It deliberately has no codec or I/O
//! dependencies.

pub mod constants;
pub mod error;
pub mod models;
pub mod report;

pub use error::{PipelineError, PipelineResult};
pub use models::{jpeg_filename, AttachmentDraft, AttachmentId, EncodedPayload, SourceRecord};
pub use report::ReportLog;
