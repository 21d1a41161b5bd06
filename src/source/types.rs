//! Layout shapes supplied by the Span Source

use super::traits::SourceError;
use serde::{Deserialize, Serialize};

/// Region on a page in PDF points, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    fn is_well_formed(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1].iter().all(|v| v.is_finite())
            && self.x1 >= self.x0
            && self.y1 >= self.y0
    }
}

/// One run of text on a page, in reading order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// 1-based page number
    pub page: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl TextSpan {
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
            bbox: None,
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }
}

/// A detected table with its reconstructed cells.
///
/// `rows` may be empty when the table is only an image; the pipeline then
/// asks the table fallback for a body and otherwise keeps the caption only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    pub table_id: String,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl TableRegion {
    pub fn new(table_id: impl Into<String>, page: u32) -> Self {
        Self {
            table_id: table_id.into(),
            page,
            bbox: None,
            caption: String::new(),
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_header<S: Into<String>>(mut self, header: Vec<S>) -> Self {
        self.header = header.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_row<S: Into<String>>(mut self, row: Vec<S>) -> Self {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn has_body(&self) -> bool {
        self.rows.iter().any(|row| row.iter().any(|c| !c.trim().is_empty()))
    }
}

/// A detected figure; image bytes stay with the upstream extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRegion {
    pub figure_id: String,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// Everything the Span Source supplies for one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub doc_id: String,
    /// Declared page count; 0 means "derive from the content"
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub spans: Vec<TextSpan>,
    #[serde(default)]
    pub tables: Vec<TableRegion>,
    #[serde(default)]
    pub figures: Vec<FigureRegion>,
}

impl SourceDocument {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            ..Default::default()
        }
    }

    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.spans.push(span);
        self
    }

    pub fn with_table(mut self, table: TableRegion) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_figure(mut self, figure: FigureRegion) -> Self {
        self.figures.push(figure);
        self
    }

    /// Declared page count, or the highest page referenced.
    pub fn effective_page_count(&self) -> u32 {
        let referenced = self
            .spans
            .iter()
            .map(|s| s.page)
            .chain(self.tables.iter().map(|t| t.page))
            .chain(self.figures.iter().map(|f| f.page))
            .max()
            .unwrap_or(0);
        self.page_count.max(referenced)
    }

    /// Reject structurally broken input: empty id, page 0, pages past the
    /// declared count, or degenerate geometry.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.doc_id.trim().is_empty() {
            return Err(SourceError::Malformed("document has no doc_id".into()));
        }
        let pages = self
            .spans
            .iter()
            .map(|s| ("span", s.page, s.bbox))
            .chain(self.tables.iter().map(|t| ("table", t.page, t.bbox)))
            .chain(self.figures.iter().map(|f| ("figure", f.page, f.bbox)));
        for (kind, page, bbox) in pages {
            if page == 0 {
                return Err(SourceError::Malformed(format!(
                    "{} references page 0 (pages are 1-based)",
                    kind
                )));
            }
            if self.page_count > 0 && page > self.page_count {
                return Err(SourceError::Malformed(format!(
                    "{} references page {} of a {}-page document",
                    kind, page, self.page_count
                )));
            }
            if let Some(b) = bbox {
                if !b.is_well_formed() {
                    return Err(SourceError::Malformed(format!(
                        "{} on page {} has a degenerate bounding box",
                        kind, page
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_zero_is_malformed() {
        let doc = SourceDocument::new("d").with_span(TextSpan::new(0, "text"));
        assert!(matches!(doc.validate(), Err(SourceError::Malformed(_))));
    }

    #[test]
    fn page_past_declared_count_is_malformed() {
        let doc = SourceDocument::new("d")
            .with_page_count(2)
            .with_span(TextSpan::new(3, "text"));
        assert!(doc.validate().is_err());
    }

    #[test]
    fn inverted_bbox_is_malformed() {
        let doc = SourceDocument::new("d")
            .with_span(TextSpan::new(1, "text").with_bbox(BoundingBox::new(10.0, 10.0, 5.0, 20.0)));
        assert!(doc.validate().is_err());
    }

    #[test]
    fn effective_page_count_uses_highest_reference() {
        let doc = SourceDocument::new("d")
            .with_span(TextSpan::new(2, "a"))
            .with_table(TableRegion::new("T1", 5));
        assert_eq!(doc.effective_page_count(), 5);
        assert_eq!(doc.clone().with_page_count(9).effective_page_count(), 9);
    }
}
