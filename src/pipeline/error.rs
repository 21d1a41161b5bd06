//! Document-level (pipeline-fatal) errors

use crate::source::SourceError;
use thiserror::Error;

/// Halts the pipeline for one document. Other documents in a batch continue.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unreadable or malformed span input: {0}")]
    Source(#[from] SourceError),

    #[error("document {doc_id} has no extractable spans")]
    NoExtractableSpans { doc_id: String },

    #[error("document {doc_id} cancelled before {stage}")]
    Cancelled { doc_id: String, stage: &'static str },

    #[error("worker for {doc_id} failed: {message}")]
    Worker { doc_id: String, message: String },
}
