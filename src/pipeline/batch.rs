//! Worker-per-document batch execution

use super::cancel::CancellationToken;
use super::error::PipelineError;
use super::runner::DocumentPipeline;
use crate::export::DocumentExport;
use crate::source::SpanSource;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Result for one input of a batch
#[derive(Debug)]
pub struct BatchOutcome {
    /// Position of the source in the input list
    pub index: usize,
    pub source_id: String,
    pub result: Result<DocumentExport, PipelineError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs many documents in parallel, each through its own pipeline pass.
///
/// Documents share nothing but the read-only pipeline and baseline. A fatal
/// error in one document never stops the others.
pub struct BatchRunner {
    pipeline: Arc<DocumentPipeline>,
    /// Limits documents in flight
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl BatchRunner {
    pub fn new(pipeline: DocumentPipeline) -> Self {
        let limit = pipeline.config().max_concurrent_documents.max(1);
        Self {
            pipeline: Arc::new(pipeline),
            semaphore: Arc::new(Semaphore::new(limit)),
            cancel: CancellationToken::new(),
        }
    }

    /// Override the configured number of concurrent documents
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// Token that cancels every document not yet past its current stage
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run every source. Outcomes come back in input order.
    pub async fn run(&self, sources: Vec<Box<dyn SpanSource>>) -> Vec<BatchOutcome> {
        let source_ids: Vec<String> = sources.iter().map(|s| s.id().to_string()).collect();
        let mut tasks = JoinSet::new();

        for (index, source) in sources.into_iter().enumerate() {
            let pipeline = self.pipeline.clone();
            let semaphore = self.semaphore.clone();
            let cancel = self.cancel.clone();
            tasks.spawn(async move {
                let source_id = source.id().to_string();
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => match source.load().await {
                        Ok(doc) => pipeline.run_with_cancel(doc, &cancel).await,
                        Err(e) => Err(PipelineError::from(e)),
                    },
                    Err(e) => Err(PipelineError::Worker {
                        doc_id: source_id.clone(),
                        message: e.to_string(),
                    }),
                };
                if let Err(e) = &result {
                    warn!(source = %source_id, error = %e, "document failed");
                }
                BatchOutcome {
                    index,
                    source_id,
                    result,
                }
            });
        }

        let mut slots: Vec<Option<BatchOutcome>> = source_ids.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    let index = outcome.index;
                    slots[index] = Some(outcome);
                }
                Err(e) => warn!(error = %e, "batch worker panicked"),
            }
        }

        let outcomes: Vec<BatchOutcome> = slots
            .into_iter()
            .zip(source_ids)
            .enumerate()
            .map(|(index, (slot, source_id))| {
                slot.unwrap_or_else(|| BatchOutcome {
                    index,
                    result: Err(PipelineError::Worker {
                        doc_id: source_id.clone(),
                        message: "worker did not complete".into(),
                    }),
                    source_id,
                })
            })
            .collect();

        info!(
            documents = outcomes.len(),
            failed = outcomes.iter().filter(|o| !o.is_ok()).count(),
            "batch finished"
        );
        outcomes
    }
}
