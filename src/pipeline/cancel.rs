//! Per-document cancellation
//!
//! The caller sets the token; the pipeline checks it between stages.
//! A stage that has started always finishes for every record.

use super::error::PipelineError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// A cooperative cancellation token, shared by clones.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Stage boundary for one document: `Cancelled` once the token is set.
    pub fn checkpoint(&self, doc_id: &str, stage: &'static str) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            info!(doc_id = %doc_id, stage, "document cancelled");
            return Err(PipelineError::Cancelled {
                doc_id: doc_id.to_string(),
                stage,
            });
        }
        Ok(())
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn checkpoint_names_document_and_stage() {
        let token = CancellationToken::new();
        assert!(token.checkpoint("d1", "extraction").is_ok());
        token.cancel();
        match token.checkpoint("d1", "extraction") {
            Err(PipelineError::Cancelled { doc_id, stage }) => {
                assert_eq!(doc_id, "d1");
                assert_eq!(stage, "extraction");
            }
            other => panic!("expected Cancelled, got {:?}", other),
        }
    }
}
