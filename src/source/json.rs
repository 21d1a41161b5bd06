//! Span Source backed by a layout JSON file
//!
//! The upstream layout parser writes one file per document:
//!
//! ```text
//! {
//!   "doc_id": "paper-7",            (optional, defaults to the file stem)
//!   "page_count": 12,               (optional)
//!   "pages": [
//!     { "page": 1,
//!       "spans":   [ { "text": "...", "bbox": {"x0":..,"y0":..,"x1":..,"y1":..} } ],
//!       "tables":  [ { "table_id": "T1", "caption": "...", "header": [..], "rows": [[..]] } ],
//!       "figures": [ { "figure_id": "F1", "caption": "..." } ] }
//!   ]
//! }
//! ```

use super::traits::{SourceError, SpanSource};
use super::types::{BoundingBox, FigureRegion, SourceDocument, TableRegion, TextSpan};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    doc_id: Option<String>,
    #[serde(default)]
    page_count: Option<u32>,
    pages: Vec<PageLayout>,
}

#[derive(Debug, Deserialize)]
struct PageLayout {
    page: u32,
    #[serde(default)]
    spans: Vec<SpanEntry>,
    #[serde(default)]
    tables: Vec<TableEntry>,
    #[serde(default)]
    figures: Vec<FigureEntry>,
}

#[derive(Debug, Deserialize)]
struct SpanEntry {
    text: String,
    #[serde(default)]
    bbox: Option<BoundingBox>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    #[serde(default)]
    table_id: Option<String>,
    #[serde(default)]
    bbox: Option<BoundingBox>,
    #[serde(default)]
    caption: String,
    #[serde(default)]
    header: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct FigureEntry {
    #[serde(default)]
    figure_id: Option<String>,
    #[serde(default)]
    bbox: Option<BoundingBox>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    image_path: Option<String>,
}

/// Reads a layout JSON file from disk.
pub struct JsonSpanSource {
    path: PathBuf,
    id: String,
}

impl JsonSpanSource {
    /// The source id (and default doc_id) is the file stem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, id }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse layout JSON text into a document.
    pub fn parse(text: &str, default_doc_id: &str) -> Result<SourceDocument, SourceError> {
        let layout: LayoutFile = serde_json::from_str(text)?;
        let mut doc = SourceDocument::new(
            layout
                .doc_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| default_doc_id.to_string()),
        );
        doc.page_count = layout.page_count.unwrap_or(0);

        let mut table_seq = 0usize;
        let mut figure_seq = 0usize;
        for page in layout.pages {
            for span in page.spans {
                doc.spans.push(TextSpan {
                    page: page.page,
                    text: span.text,
                    bbox: span.bbox,
                });
            }
            for table in page.tables {
                table_seq += 1;
                doc.tables.push(TableRegion {
                    table_id: table.table_id.unwrap_or_else(|| format!("T{}", table_seq)),
                    page: page.page,
                    bbox: table.bbox,
                    caption: table.caption,
                    header: table.header,
                    rows: table.rows,
                });
            }
            for figure in page.figures {
                figure_seq += 1;
                doc.figures.push(FigureRegion {
                    figure_id: figure.figure_id.unwrap_or_else(|| format!("F{}", figure_seq)),
                    page: page.page,
                    bbox: figure.bbox,
                    caption: figure.caption,
                    image_path: figure.image_path,
                });
            }
        }

        doc.validate()?;
        Ok(doc)
    }
}

#[async_trait]
impl SpanSource for JsonSpanSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn load(&self) -> Result<SourceDocument, SourceError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        Self::parse(&text, &self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LAYOUT: &str = r#"{
        "page_count": 2,
        "pages": [
            {"page": 1, "spans": [{"text": "PEO films were cast."}]},
            {"page": 2,
             "spans": [{"text": "We measured 1.2e-4 S/cm.", "bbox": {"x0": 1, "y0": 2, "x1": 3, "y1": 4}}],
             "tables": [{"caption": "Table 1. Conductivity", "header": ["Sample", "σ (S/cm)"], "rows": [["PEO", "1e-5"]]}],
             "figures": [{"caption": "Figure 1. Nyquist plot"}]}
        ]
    }"#;

    #[test]
    fn parses_pages_into_flat_document() {
        let doc = JsonSpanSource::parse(LAYOUT, "paper").unwrap();
        assert_eq!(doc.doc_id, "paper");
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.spans.len(), 2);
        assert_eq!(doc.spans[1].page, 2);
        assert!(doc.spans[1].bbox.is_some());
        assert_eq!(doc.tables[0].table_id, "T1");
        assert_eq!(doc.tables[0].page, 2);
        assert_eq!(doc.figures[0].figure_id, "F1");
    }

    #[test]
    fn rejects_page_beyond_declared_count() {
        let text = r#"{"page_count": 1, "pages": [{"page": 4, "spans": [{"text": "x"}]}]}"#;
        let err = JsonSpanSource::parse(text, "paper").unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn rejects_non_json() {
        let err = JsonSpanSource::parse("%PDF-1.7", "paper").unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }

    #[tokio::test]
    async fn loads_from_disk_with_file_stem_as_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smith2021.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(LAYOUT.as_bytes()).unwrap();

        let source = JsonSpanSource::new(&path);
        assert_eq!(source.id(), "smith2021");
        let doc = source.load().await.unwrap();
        assert_eq!(doc.doc_id, "smith2021");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = JsonSpanSource::new("/nonexistent/ironclad/layout.json");
        assert!(matches!(source.load().await, Err(SourceError::Io(_))));
    }
}
