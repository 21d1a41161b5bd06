//! Span Source boundary
//!
//! The layout parser, OCR and VLM live outside this crate. This module holds
//! the shapes they hand over (page-tagged text spans, table and figure
//! regions), the traits the pipeline consumes, and the bounded-timeout
//! wrapper around the optional table-body fallback.

mod fallback;
mod json;
mod traits;
mod types;

pub use fallback::{recover_with_timeout, CommandTableFallback, MockTableFallback, TableBody};
pub use json::JsonSpanSource;
pub use traits::{FallbackError, SourceError, SpanSource, TableFallback};
pub use types::{BoundingBox, FigureRegion, SourceDocument, TableRegion, TextSpan};
