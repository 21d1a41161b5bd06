//! Document-level metadata (produced upstream, carried into the export)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub doc_id: String,
    pub page_count: u32,
    /// Text spans handed to extraction (after DOI/noise filtering)
    pub block_count: usize,
    pub table_count: usize,
    pub figure_count: usize,
}
