//! Gateways to the pipeline's external collaborators.
//!
//! The orchestrator only ever talks to the traits in [`traits`]; the
//! in-memory implementations back tests and the filesystem implementations
//! back the CLI.

pub mod fs;
pub mod memory;
pub mod traits;

pub use fs::{DirRecordSource, FsAttachmentStore, FsReportSink};
pub use memory::{MemoryAttachmentStore, MemoryReportSink, StaticRecordSource, StoredAttachment};
pub use traits::{AttachmentStore, RecordSource, ReportSink};
