//! Span Source and table fallback contracts

use super::fallback::TableBody;
use super::types::{SourceDocument, TableRegion};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors reading or validating Span Source input. Fatal for the document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed span input: {0}")]
    Malformed(String),
}

/// Errors from the external table fallback. Never fatal: the pipeline logs
/// them and keeps the table's caption only.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("fallback unavailable: {0}")]
    Unavailable(String),

    #[error("fallback timed out after {0:?}")]
    Timeout(Duration),

    #[error("fallback failed: {0}")]
    Failed(String),
}

/// Supplies page-tagged spans and table/figure regions for one document.
#[async_trait]
pub trait SpanSource: Send + Sync {
    /// Identifier used in logs and batch outcomes
    fn id(&self) -> &str;

    /// Load the document. Unreadable or malformed input is an error.
    async fn load(&self) -> Result<SourceDocument, SourceError>;
}

/// In-memory documents are their own source.
#[async_trait]
impl SpanSource for SourceDocument {
    fn id(&self) -> &str {
        &self.doc_id
    }

    async fn load(&self) -> Result<SourceDocument, SourceError> {
        Ok(self.clone())
    }
}

/// Recovers a table body (OCR, VLM, ...) for a region whose text layer is empty.
///
/// Implementations may block on a third-party binary or service; callers
/// go through [`super::recover_with_timeout`].
#[async_trait]
pub trait TableFallback: Send + Sync {
    fn id(&self) -> &str;

    async fn recover(&self, region: &TableRegion) -> Result<TableBody, FallbackError>;
}
