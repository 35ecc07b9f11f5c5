//! The one user-triggered action: regenerate every size and format variant
//! for a directory of source images, then persist and point at the report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use revariant_gateway::{DirRecordSource, FsAttachmentStore, FsReportSink};
use revariant_pipeline::{BatchConfig, BatchOrchestrator};

#[derive(Parser)]
#[command(
    name = "revariant",
    about = "Regenerate product image variants in every size and format"
)]
struct Args {
    /// Directory containing the source .webp images.
    source_dir: PathBuf,

    /// Output directory for attachments, the index, and reports.
    #[arg(long, default_value = "revariant-out")]
    out: PathBuf,

    /// Per-image decode deadline in seconds.
    #[arg(long, default_value_t = 30)]
    decode_timeout_secs: u64,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let source = Arc::new(DirRecordSource::new(&args.source_dir));
    let store = Arc::new(FsAttachmentStore::new(&args.out).await?);
    let sink = Arc::new(FsReportSink::new(&args.out));

    let config = BatchConfig {
        decode_timeout: Duration::from_secs(args.decode_timeout_secs),
        ..Default::default()
    };

    let outcome = BatchOrchestrator::new(source, store, sink.clone(), config)
        .run()
        .await?;

    tracing::info!(
        processed = outcome.processed,
        failed = outcome.failed,
        report = %sink.report_path(outcome.report_id).display(),
        "batch finished"
    );
    Ok(())
}
