//! The batch orchestrator.
//!
//! Records are processed strictly sequentially: reference-id linkage (each
//! smaller size and each JPEG must link to a just-created attachment)
//! stays consistent without any synchronization. The only shared state is
//! the [`RunContext`] the orchestrator owns for the duration of the run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::GenericImageView;
use uuid::Uuid;

use revariant_core::constants::{
    ATTACHMENT_OWNER_MODEL, DEFAULT_DECODE_TIMEOUT, MIME_JPEG, MIME_WEBP, VARIANT_QUALITY,
};
use revariant_core::{
    jpeg_filename, AttachmentDraft, AttachmentId, EncodedPayload, PipelineError, PipelineResult,
    SourceRecord,
};
use revariant_gateway::{AttachmentStore, RecordSource, ReportSink};
use revariant_processing::{decode_image, encode_jpeg, encode_webp, payload_bytes, scale_to, SizeLadder};

use crate::context::RunContext;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Deadline for decoding one source payload.
    pub decode_timeout: Duration,
    /// Name recorded on the persisted report entity.
    pub report_name: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
            report_name: "Fix Image Report".to_string(),
        }
    }
}

/// Summary of a finished run. Produced exactly once per batch, after the
/// report has been persisted, regardless of per-record failures.
#[derive(Debug)]
pub struct BatchOutcome {
    pub report_id: Uuid,
    pub total_records: usize,
    pub processed: usize,
    pub failed: usize,
}

pub struct BatchOrchestrator {
    source: Arc<dyn RecordSource>,
    store: Arc<dyn AttachmentStore>,
    sink: Arc<dyn ReportSink>,
    config: BatchConfig,
}

impl BatchOrchestrator {
    pub fn new(
        source: Arc<dyn RecordSource>,
        store: Arc<dyn AttachmentStore>,
        sink: Arc<dyn ReportSink>,
        config: BatchConfig,
    ) -> Self {
        Self {
            source,
            store,
            sink,
            config,
        }
    }

    /// Run the whole batch and persist the report.
    ///
    /// Record-scoped failures (decode timeout, undecodable payload, zero
    /// dimensions, encode failure) skip the record and continue; the
    /// failure is listed in the report. A gateway failure aborts the
    /// remaining batch, but the partial report is still persisted before
    /// the error propagates.
    pub async fn run(&self) -> PipelineResult<BatchOutcome> {
        let started = Instant::now();
        let mut ctx = RunContext::new();

        let records = self.source.list_records().await?;
        ctx.report.log(format!("Found {} products.", records.len()));

        let with_images: Vec<SourceRecord> = records
            .into_iter()
            .filter(SourceRecord::has_image)
            .collect();
        ctx.report
            .log(format!("Found {} products with images.", with_images.len()));

        ctx.report.section("STARTING IMAGE FIX SCRIPT", '=');

        let total = with_images.len();
        let mut failed = 0usize;
        let mut abort: Option<PipelineError> = None;

        for (index, record) in with_images.iter().enumerate() {
            let progress = (index + 1) as f64 / total as f64 * 100.0;
            ctx.report
                .section(&format!("PROGRESS COMPLETED: {progress:.2}% Complete"), '#');
            ctx.report
                .section(&format!("Processing [{}] ({})", record.name, record.id), '-');

            match self.process_record(record, &mut ctx).await {
                Ok(()) => {}
                Err(err) if err.is_record_scoped() => {
                    failed += 1;
                    tracing::warn!(record = %record.id, error = %err, "record skipped");
                    ctx.report
                        .log(format!("FAILED [{}] ({}): {err}", record.name, record.id));
                    // JPEGs queued before the failure pair with primaries
                    // that were already persisted; keep that pairing.
                    if let Err(flush_err) = ctx.flush_jpeg_queue(self.store.as_ref()).await {
                        abort = Some(flush_err);
                        break;
                    }
                }
                Err(err) => {
                    failed += 1;
                    ctx.report
                        .log(format!("ABORTED at [{}] ({}): {err}", record.name, record.id));
                    abort = Some(err);
                    break;
                }
            }
        }

        match &abort {
            None => ctx.report.section("ALL PRODUCTS PROCESSED", '*'),
            Some(err) => {
                tracing::error!(error = %err, "batch aborted");
                ctx.report.section("BATCH ABORTED", '*');
            }
        }
        ctx.report.log(format!(
            "Image fix completed in {:.2}s.",
            started.elapsed().as_secs_f64()
        ));

        ctx.report.section("GENERATING FINAL REPORT", '*');
        let message = ctx.report.into_message();
        let report_id = self
            .sink
            .persist_report(&self.config.report_name, &message)
            .await?;
        self.sink.display(report_id).await;

        match abort {
            Some(err) => Err(err),
            None => Ok(BatchOutcome {
                report_id,
                total_records: total,
                processed: total - failed,
                failed,
            }),
        }
    }

    /// Process one record: decode, then fold over the size ladder,
    /// threading the reference id of the first persisted attachment
    /// through every subsequent link.
    async fn process_record(
        &self,
        record: &SourceRecord,
        ctx: &mut RunContext,
    ) -> PipelineResult<()> {
        let original = payload_bytes(&record.image)?;
        let image = decode_image(original.clone(), self.config.decode_timeout).await?;

        let (width, height) = image.dimensions();
        let ladder = SizeLadder::for_dimensions(width, height)?;

        let mut reference_id: Option<AttachmentId> = None;
        for size in ladder.iter() {
            let surface = scale_to(&image, size, ladder.longest_edge());
            let full_size = size == ladder.longest_edge();

            // Full size reuses the source bytes verbatim; re-encoding at
            // ratio 1.0 would add a lossy generation.
            let primary = if full_size {
                EncodedPayload {
                    bytes: original.clone(),
                    mime_type: MIME_WEBP,
                    quality: VARIANT_QUALITY,
                }
            } else {
                encode_webp(&surface)?
            };

            let created = self
                .store
                .create_unique(vec![AttachmentDraft {
                    name: record.name.clone(),
                    description: if full_size {
                        String::new()
                    } else {
                        format!("resize: {size}")
                    },
                    payload: primary.bytes,
                    linked_to: reference_id,
                    owner_model: ATTACHMENT_OWNER_MODEL.to_string(),
                    mime_type: MIME_WEBP.to_string(),
                }])
                .await?;
            let primary_id = *created
                .first()
                .ok_or_else(|| PipelineError::Persistence("store returned no id".to_string()))?;
            ctx.report
                .log(format!("Created WebP image ({size}px), ID: {primary_id}"));

            // Keep track of the original.
            reference_id = reference_id.or(Some(primary_id));

            let secondary = encode_jpeg(&surface)?;
            ctx.report
                .log(format!("Queued JPEG ({size}px) for [{}]", record.name));
            ctx.queue_jpeg(AttachmentDraft {
                name: jpeg_filename(&record.name),
                description: "format: jpeg".to_string(),
                payload: secondary.bytes,
                linked_to: Some(primary_id),
                owner_model: ATTACHMENT_OWNER_MODEL.to_string(),
                mime_type: MIME_JPEG.to_string(),
            });
        }

        ctx.flush_jpeg_queue(self.store.as_ref()).await
    }
}
