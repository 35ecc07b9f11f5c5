//! Per-run state, owned explicitly by the orchestrator.
//!
//! The upstream implementation kept the report and the pending-JPEG queue
//! as ambient component fields; holding them in one context object gives
//! the queue a defined owner and a defined flush point.

use revariant_core::{AttachmentDraft, PipelineResult, ReportLog};
use revariant_gateway::AttachmentStore;

/// Mutable state for one batch run: the report log and the queue of
/// secondary-format payloads awaiting their batched persistence call.
#[derive(Debug, Default)]
pub struct RunContext {
    pub report: ReportLog,
    jpeg_queue: Vec<AttachmentDraft>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a secondary-format payload for the next flush.
    pub fn queue_jpeg(&mut self, draft: AttachmentDraft) {
        self.jpeg_queue.push(draft);
    }

    pub fn queued_jpegs(&self) -> usize {
        self.jpeg_queue.len()
    }

    /// Persist every queued JPEG in one batched call and log the created
    /// ids. A no-op (with its own banner) when nothing is queued.
    pub async fn flush_jpeg_queue(&mut self, store: &dyn AttachmentStore) -> PipelineResult<()> {
        if self.jpeg_queue.is_empty() {
            self.report.section("NO JPEG IMAGES TO PROCESS", '*');
            return Ok(());
        }

        self.report.section("PROCESSING JPEG QUEUE", '=');
        let drafts = std::mem::take(&mut self.jpeg_queue);
        let created = store.create_unique(drafts).await?;
        let ids = created
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.report
            .log(format!("Created {} JPEG images with id(s): {ids}.", created.len()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use revariant_core::constants::{ATTACHMENT_OWNER_MODEL, MIME_JPEG};
    use revariant_gateway::MemoryAttachmentStore;

    fn jpeg_draft(payload: &[u8]) -> AttachmentDraft {
        AttachmentDraft {
            name: "chair.jpg".to_string(),
            description: "format: jpeg".to_string(),
            payload: Bytes::copy_from_slice(payload),
            linked_to: None,
            owner_model: ATTACHMENT_OWNER_MODEL.to_string(),
            mime_type: MIME_JPEG.to_string(),
        }
    }

    #[tokio::test]
    async fn flush_empties_the_queue_and_logs_the_count() {
        let store = MemoryAttachmentStore::new();
        let mut ctx = RunContext::new();
        ctx.queue_jpeg(jpeg_draft(b"one"));
        ctx.queue_jpeg(jpeg_draft(b"two"));

        ctx.flush_jpeg_queue(&store).await.unwrap();

        assert_eq!(ctx.queued_jpegs(), 0);
        assert_eq!(store.len(), 2);
        assert!(ctx
            .report
            .lines()
            .iter()
            .any(|l| l.contains("Created 2 JPEG images")));
    }

    #[tokio::test]
    async fn empty_flush_logs_a_banner_and_creates_nothing() {
        let store = MemoryAttachmentStore::new();
        let mut ctx = RunContext::new();

        ctx.flush_jpeg_queue(&store).await.unwrap();

        assert!(store.is_empty());
        assert!(ctx
            .report
            .lines()
            .iter()
            .any(|l| l.contains("NO JPEG IMAGES TO PROCESS")));
    }
}
