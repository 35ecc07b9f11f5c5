//! Batch orchestration: drive decode → resize → encode → persist for every
//! source record, accumulate the run report, and flush it once at the end.

pub mod context;
pub mod orchestrator;

pub use context::RunContext;
pub use orchestrator::{BatchConfig, BatchOrchestrator, BatchOutcome};
