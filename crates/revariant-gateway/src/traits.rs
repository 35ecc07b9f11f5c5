//! Collaborator traits.
//!
//! These are the contracts the host platform provides in the original
//! deployment: a queryable record source, a content-deduplicating
//! attachment store, and a sink that persists and displays the run report.

use async_trait::async_trait;
use uuid::Uuid;

use revariant_core::{AttachmentDraft, AttachmentId, PipelineResult, SourceRecord};

/// Lists the product records whose image variants need regenerating.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// All records, in a stable order, including those without an image
    /// payload. The orchestrator filters and reports the counts.
    async fn list_records(&self) -> PipelineResult<Vec<SourceRecord>>;
}

/// Persists encoded image payloads.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Create one attachment per draft, deduplicating by payload content:
    /// a draft whose bytes match an existing attachment returns the
    /// existing id instead of creating a duplicate. Ids come back in input
    /// order.
    async fn create_unique(
        &self,
        drafts: Vec<AttachmentDraft>,
    ) -> PipelineResult<Vec<AttachmentId>>;
}

/// Persists the run report and asks the host to show it.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Store the assembled report as one log entity, returning its id.
    async fn persist_report(&self, name: &str, message: &str) -> PipelineResult<Uuid>;

    /// Request a detail view for the persisted report. Fire-and-forget;
    /// no return value is consumed.
    async fn display(&self, report_id: Uuid);
}
