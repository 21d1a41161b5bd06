//! Document pipeline and batch runner
//!
//! Stages run in a fixed order per document. Comparison starts only after
//! every record has been normalized, checked and classified. Documents in a
//! batch are independent and run on their own worker.

mod batch;
mod cancel;
mod config;
mod error;
mod runner;

pub use batch::{BatchOutcome, BatchRunner};
pub use cancel::CancellationToken;
pub use config::{ConfigError, FallbackCommand, PipelineConfig};
pub use error::PipelineError;
pub use runner::{DocumentPipeline, MAX_RECORD_CONFIDENCE, SI_CONFIDENCE_BONUS};
