//! Filesystem gateway implementations used by the CLI.
//!
//! `FsAttachmentStore` writes each payload under `attachments/` and keeps
//! a JSON index carrying the attachment metadata and a content digest for
//! deduplication. `DirRecordSource` turns a directory of `.webp` files
//! into source records. `FsReportSink` writes the run report under
//! `reports/`.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use uuid::Uuid;

use revariant_core::constants::{MIME_JPEG, MIME_WEBP};
use revariant_core::{AttachmentDraft, AttachmentId, PipelineError, PipelineResult, SourceRecord};

use crate::traits::{AttachmentStore, RecordSource, ReportSink};

const INDEX_FILE: &str = "index.json";
const ATTACHMENT_DIR: &str = "attachments";
const REPORT_DIR: &str = "reports";

fn io_err(context: &str, err: std::io::Error) -> PipelineError {
    PipelineError::Persistence(format!("{context}: {err}"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    id: AttachmentId,
    name: String,
    description: String,
    linked_to: Option<AttachmentId>,
    owner_model: String,
    mime_type: String,
    digest: String,
    file: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Index {
    entries: Vec<IndexEntry>,
}

/// Attachment store backed by a directory plus a JSON index.
pub struct FsAttachmentStore {
    base_path: PathBuf,
    index: tokio::sync::Mutex<Index>,
}

impl FsAttachmentStore {
    /// Open or create a store rooted at `base_path`.
    pub async fn new(base_path: impl Into<PathBuf>) -> PipelineResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(base_path.join(ATTACHMENT_DIR))
            .await
            .map_err(|e| io_err("failed to create attachment directory", e))?;

        let index_path = base_path.join(INDEX_FILE);
        let index = if index_path.exists() {
            let raw = fs::read(&index_path)
                .await
                .map_err(|e| io_err("failed to read attachment index", e))?;
            serde_json::from_slice(&raw)
                .map_err(|e| PipelineError::Persistence(format!("corrupt attachment index: {e}")))?
        } else {
            Index::default()
        };

        Ok(Self {
            base_path,
            index: tokio::sync::Mutex::new(index),
        })
    }

    fn extension_for(mime_type: &str) -> &'static str {
        match mime_type {
            MIME_WEBP => "webp",
            MIME_JPEG => "jpg",
            _ => "bin",
        }
    }

    async fn save_index(&self, index: &Index) -> PipelineResult<()> {
        let raw = serde_json::to_vec_pretty(index)
            .map_err(|e| PipelineError::Persistence(format!("failed to serialize index: {e}")))?;
        fs::write(self.base_path.join(INDEX_FILE), raw)
            .await
            .map_err(|e| io_err("failed to write attachment index", e))
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn create_unique(
        &self,
        drafts: Vec<AttachmentDraft>,
    ) -> PipelineResult<Vec<AttachmentId>> {
        let mut index = self.index.lock().await;
        let mut ids = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let digest = hex::encode(Sha256::digest(&draft.payload));
            if let Some(existing) = index.entries.iter().find(|e| e.digest == digest) {
                ids.push(existing.id);
                continue;
            }

            let id = Uuid::new_v4();
            let file = format!(
                "{ATTACHMENT_DIR}/{id}.{}",
                Self::extension_for(&draft.mime_type)
            );
            fs::write(self.base_path.join(&file), &draft.payload)
                .await
                .map_err(|e| io_err("failed to write attachment payload", e))?;

            index.entries.push(IndexEntry {
                id,
                name: draft.name,
                description: draft.description,
                linked_to: draft.linked_to,
                owner_model: draft.owner_model,
                mime_type: draft.mime_type,
                digest,
                file,
            });
            ids.push(id);
        }

        self.save_index(&index).await?;
        Ok(ids)
    }
}

/// Record source reading `.webp` files from one directory, ordered by
/// filename.
pub struct DirRecordSource {
    dir: PathBuf,
}

impl DirRecordSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl RecordSource for DirRecordSource {
    async fn list_records(&self) -> PipelineResult<Vec<SourceRecord>> {
        let mut dir = fs::read_dir(&self.dir)
            .await
            .map_err(|e| io_err("failed to read source directory", e))?;

        let mut paths: Vec<PathBuf> = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| io_err("failed to read source directory entry", e))?
        {
            let path = entry.path();
            let is_webp = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("webp"));
            if is_webp {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = fs::read(&path)
                .await
                .map_err(|e| io_err("failed to read source image", e))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unnamed.webp")
                .to_string();
            records.push(SourceRecord {
                id: Uuid::new_v4(),
                name,
                image: STANDARD.encode(raw),
            });
        }

        Ok(records)
    }
}

/// Report sink writing one log file per run.
pub struct FsReportSink {
    base_path: PathBuf,
}

impl FsReportSink {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn report_path(&self, report_id: Uuid) -> PathBuf {
        self.base_path.join(REPORT_DIR).join(format!("{report_id}.log"))
    }
}

#[async_trait]
impl ReportSink for FsReportSink {
    async fn persist_report(&self, name: &str, message: &str) -> PipelineResult<Uuid> {
        fs::create_dir_all(self.base_path.join(REPORT_DIR))
            .await
            .map_err(|e| io_err("failed to create report directory", e))?;

        let id = Uuid::new_v4();
        let generated_at = chrono::Utc::now().to_rfc3339();
        let body = format!("{name}\nGenerated at {generated_at}\n\n{message}\n");
        fs::write(self.report_path(id), body)
            .await
            .map_err(|e| io_err("failed to write report", e))?;
        Ok(id)
    }

    async fn display(&self, report_id: Uuid) {
        // Navigation in the host opens a detail view; here the closest
        // equivalent is pointing the operator at the file.
        tracing::info!(path = %self.report_path(report_id).display(), "report ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use revariant_core::constants::ATTACHMENT_OWNER_MODEL;

    fn draft(name: &str, payload: &[u8], mime: &str) -> AttachmentDraft {
        AttachmentDraft {
            name: name.to_string(),
            description: String::new(),
            payload: Bytes::copy_from_slice(payload),
            linked_to: None,
            owner_model: ATTACHMENT_OWNER_MODEL.to_string(),
            mime_type: mime.to_string(),
        }
    }

    #[tokio::test]
    async fn store_writes_payload_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAttachmentStore::new(dir.path()).await.unwrap();

        let ids = store
            .create_unique(vec![draft("chair.webp", b"payload", MIME_WEBP)])
            .await
            .unwrap();
        assert_eq!(ids.len(), 1);

        let file = dir.path().join(format!("attachments/{}.webp", ids[0]));
        assert_eq!(std::fs::read(file).unwrap(), b"payload");
        assert!(dir.path().join("index.json").exists());
    }

    #[tokio::test]
    async fn dedup_survives_reopening_the_store() {
        let dir = tempfile::tempdir().unwrap();

        let store = FsAttachmentStore::new(dir.path()).await.unwrap();
        let first = store
            .create_unique(vec![draft("a.webp", b"same bytes", MIME_WEBP)])
            .await
            .unwrap();

        let store = FsAttachmentStore::new(dir.path()).await.unwrap();
        let second = store
            .create_unique(vec![draft("a.webp", b"same bytes", MIME_WEBP)])
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn jpeg_payloads_get_the_jpg_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAttachmentStore::new(dir.path()).await.unwrap();

        let ids = store
            .create_unique(vec![draft("chair.jpg", b"jpeg bytes", MIME_JPEG)])
            .await
            .unwrap();
        assert!(dir
            .path()
            .join(format!("attachments/{}.jpg", ids[0]))
            .exists());
    }

    #[tokio::test]
    async fn dir_source_lists_webp_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.webp"), b"two").unwrap();
        std::fs::write(dir.path().join("a.webp"), b"one").unwrap();
        std::fs::write(dir.path().join("ignored.png"), b"nope").unwrap();

        let source = DirRecordSource::new(dir.path());
        let records = source.list_records().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "a.webp");
        assert_eq!(records[1].name, "b.webp");
        assert_eq!(records[0].image, STANDARD.encode(b"one"));
    }

    #[tokio::test]
    async fn report_sink_writes_one_file_per_report() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsReportSink::new(dir.path());

        let id = sink.persist_report("Fix Image Report", "line").await.unwrap();
        let body = std::fs::read_to_string(sink.report_path(id)).unwrap();
        assert!(body.starts_with("Fix Image Report"));
        assert!(body.contains("line"));

        // Header carries the generation timestamp.
        let this_year = chrono::Utc::now().format("Generated at %Y-").to_string();
        assert!(body.contains(&this_year));

        sink.display(id).await; // fire-and-forget, must not panic
    }
}
