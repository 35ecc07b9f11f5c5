//! In-memory gateway implementations.
//!
//! `MemoryAttachmentStore` mirrors the host store's content deduplication
//! (same payload bytes, same id) and records every draft it sees, which is
//! what the pipeline tests assert against.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use revariant_core::{AttachmentDraft, AttachmentId, PipelineResult, SourceRecord};

use crate::traits::{AttachmentStore, RecordSource, ReportSink};

/// A fixed set of records, returned as-is.
#[derive(Debug, Default)]
pub struct StaticRecordSource {
    records: Vec<SourceRecord>,
}

impl StaticRecordSource {
    pub fn new(records: Vec<SourceRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticRecordSource {
    async fn list_records(&self) -> PipelineResult<Vec<SourceRecord>> {
        Ok(self.records.clone())
    }
}

/// One attachment as retained by [`MemoryAttachmentStore`].
#[derive(Debug, Clone)]
pub struct StoredAttachment {
    pub id: AttachmentId,
    pub draft: AttachmentDraft,
}

#[derive(Default)]
struct StoreState {
    by_digest: HashMap<[u8; 32], AttachmentId>,
    attachments: Vec<StoredAttachment>,
}

/// Content-deduplicating attachment store backed by a hash map.
#[derive(Default)]
pub struct MemoryAttachmentStore {
    state: Mutex<StoreState>,
}

impl MemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every attachment created so far, creation order.
    pub fn attachments(&self) -> Vec<StoredAttachment> {
        self.state.lock().unwrap().attachments.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn digest(payload: &[u8]) -> [u8; 32] {
        Sha256::digest(payload).into()
    }
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    async fn create_unique(
        &self,
        drafts: Vec<AttachmentDraft>,
    ) -> PipelineResult<Vec<AttachmentId>> {
        let mut state = self.state.lock().unwrap();
        let mut ids = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let digest = Self::digest(&draft.payload);
            if let Some(&existing) = state.by_digest.get(&digest) {
                ids.push(existing);
                continue;
            }

            let id = Uuid::new_v4();
            state.by_digest.insert(digest, id);
            state.attachments.push(StoredAttachment { id, draft });
            ids.push(id);
        }

        Ok(ids)
    }
}

/// Report sink that keeps persisted reports in memory.
#[derive(Default)]
pub struct MemoryReportSink {
    reports: Mutex<Vec<(Uuid, String, String)>>,
    displayed: Mutex<Vec<Uuid>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persisted reports as (id, name, message).
    pub fn reports(&self) -> Vec<(Uuid, String, String)> {
        self.reports.lock().unwrap().clone()
    }

    pub fn displayed(&self) -> Vec<Uuid> {
        self.displayed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn persist_report(&self, name: &str, message: &str) -> PipelineResult<Uuid> {
        let id = Uuid::new_v4();
        self.reports
            .lock()
            .unwrap()
            .push((id, name.to_string(), message.to_string()));
        Ok(id)
    }

    async fn display(&self, report_id: Uuid) {
        self.displayed.lock().unwrap().push(report_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use revariant_core::constants::{ATTACHMENT_OWNER_MODEL, MIME_WEBP};

    fn draft(name: &str, payload: &[u8]) -> AttachmentDraft {
        AttachmentDraft {
            name: name.to_string(),
            description: String::new(),
            payload: Bytes::copy_from_slice(payload),
            linked_to: None,
            owner_model: ATTACHMENT_OWNER_MODEL.to_string(),
            mime_type: MIME_WEBP.to_string(),
        }
    }

    #[tokio::test]
    async fn identical_payloads_share_one_id() {
        let store = MemoryAttachmentStore::new();
        let ids = store
            .create_unique(vec![draft("a", b"same"), draft("b", b"same")])
            .await
            .unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn rerun_returns_the_original_ids() {
        let store = MemoryAttachmentStore::new();
        let first = store.create_unique(vec![draft("a", b"one")]).await.unwrap();
        let second = store.create_unique(vec![draft("a", b"one")]).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn distinct_payloads_get_distinct_ids_in_input_order() {
        let store = MemoryAttachmentStore::new();
        let ids = store
            .create_unique(vec![draft("a", b"one"), draft("b", b"two")])
            .await
            .unwrap();
        assert_ne!(ids[0], ids[1]);

        let stored = store.attachments();
        assert_eq!(stored[0].draft.name, "a");
        assert_eq!(stored[1].draft.name, "b");
    }

    #[tokio::test]
    async fn report_sink_retains_message_and_display_requests() {
        let sink = MemoryReportSink::new();
        let id = sink.persist_report("run report", "line 1\nline 2").await.unwrap();
        sink.display(id).await;

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].1, "run report");
        assert_eq!(sink.displayed(), vec![id]);
    }
}
