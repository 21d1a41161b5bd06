//! Core data model: records, comparison rows, document metadata

mod comparison;
mod document;
mod record;

pub use comparison::{BaselineEntry, ComparisonRow, NoveltyFlag, UnitSpace};
pub use document::DocumentMeta;
pub use record::{
    ConstraintReport, NormalizationTrace, Origin, OriginAssessment, Provenance, Record,
    SourceKind,
};
