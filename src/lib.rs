//! Ironclad: proof-carrying property extraction for scientific documents
//!
//! Turns page-indexed text spans and table regions into auditable property
//! claims. Every claim keeps its provenance (page + verbatim snippet) and a
//! proof trail (unit conversion, constraint results, origin cues), and the
//! claims are aggregated into a paper-centric comparison against cited
//! literature and an optional external baseline.
//!
//! # Pipeline
//!
//! - **extract**: rule tables turn spans and table cells into [`Record`]s
//! - **units**: original unit → SI, with an invertible trace
//! - **constraints**: dimensional, range, cross-field and context checks
//! - **origin**: deterministic `this_work | literature | mixed | unclear`
//! - **compare**: per (material, property, category) comparison rows
//!
//! # Example
//!
//! ```
//! use ironclad::{DocumentPipeline, PipelineConfig, SourceDocument, TextSpan};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let doc = SourceDocument::new("demo").with_span(TextSpan::new(
//!     1,
//!     "In this work, ionic conductivity reached 1.2×10⁻⁴ S/cm at 25°C.",
//! ));
//! let pipeline = DocumentPipeline::new(PipelineConfig::default());
//! let export = rt.block_on(pipeline.run_document(doc)).unwrap();
//! assert_eq!(export.records.len(), 1);
//! ```

pub mod compare;
pub mod constraints;
pub mod export;
pub mod extract;
pub mod model;
pub mod ontology;
pub mod origin;
pub mod pipeline;
pub mod source;
pub mod units;

pub use compare::{build_comparison, load_baseline, BaselineError};
pub use export::{DocumentExport, ExportError, FigureImage, FigureManifest};
pub use model::{
    BaselineEntry, ComparisonRow, ConstraintReport, DocumentMeta, NormalizationTrace,
    NoveltyFlag, Origin, OriginAssessment, Provenance, Record, SourceKind, UnitSpace,
};
pub use pipeline::{
    BatchOutcome, BatchRunner, CancellationToken, ConfigError, DocumentPipeline, PipelineConfig,
    PipelineError,
};
pub use source::{
    BoundingBox, FallbackError, FigureRegion, JsonSpanSource, SourceDocument, SourceError,
    SpanSource, TableFallback, TableRegion, TextSpan,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
