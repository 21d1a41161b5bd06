//! Property extraction: spans and table regions → candidate records
//!
//! Rules are ordered tables (see [`crate::ontology`]). Every record carries
//! its page and verbatim snippet; SI values, origin and constraints are left
//! for later stages.

mod citations;
mod numeric;
mod sentences;
mod table;
mod text;

pub use citations::detect_citations;
pub use numeric::{parse_number, scan_values, ValueMatch};
pub use sentences::split_sentences;
pub use table::extract_from_table;
pub use text::extract_from_text;

use crate::model::Record;
use crate::ontology::{self, PropertyMention};
use crate::source::{SourceDocument, TextSpan};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Material used when neither the sentence nor the document names one
pub const UNKNOWN_MATERIAL: &str = "UNKNOWN";

/// Base confidence of a text-extracted record
pub const TEXT_CONFIDENCE: f64 = 0.50;
/// Base confidence of a table-extracted record
pub const TABLE_CONFIDENCE: f64 = 0.70;

static DOI_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:doi\s*:?\s*|https?://(?:dx\.)?doi\.org/)10\.\d{4,9}/\S+\s*$")
        .expect("invalid DOI pattern")
});

/// Document-wide extraction settings
#[derive(Debug, Clone)]
pub struct ExtractContext {
    pub default_material: String,
    pub include_tables: bool,
}

impl ExtractContext {
    pub fn new(default_material: impl Into<String>) -> Self {
        Self {
            default_material: default_material.into(),
            include_tables: true,
        }
    }

    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Context for `doc`: an explicit override, else the most frequent
    /// material named in the document, else [`UNKNOWN_MATERIAL`].
    pub fn for_document(doc: &SourceDocument, material_override: Option<&str>) -> Self {
        let material = material_override
            .map(str::to_string)
            .or_else(|| document_material(doc))
            .unwrap_or_else(|| UNKNOWN_MATERIAL.to_string());
        Self::new(material)
    }
}

/// Most frequent material-lexicon hit across spans and table captions.
/// Ties go to the material seen first.
pub fn document_material(doc: &SourceDocument) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let texts = doc
        .spans
        .iter()
        .map(|s| s.text.as_str())
        .chain(doc.tables.iter().map(|t| t.caption.as_str()));
    let mut order = 0;
    for text in texts {
        for hit in ontology::material_hits(text) {
            let entry = counts.entry(hit).or_insert((0, order));
            entry.0 += 1;
            order += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, oa)), (_, (cb, ob))| ca.cmp(cb).then(ob.cmp(oa)))
        .map(|(name, _)| name.to_string())
}

/// Spans that carry nothing but a DOI line are layout noise.
pub fn is_doi_only(text: &str) -> bool {
    DOI_LINE_RE.is_match(text)
}

/// Spans handed to the text rules.
pub fn extractable_spans(doc: &SourceDocument) -> impl Iterator<Item = &TextSpan> {
    doc.spans
        .iter()
        .filter(|s| !s.text.trim().is_empty() && !is_doi_only(&s.text))
}

/// Property mentions with overlaps resolved in favor of the longer match.
pub(crate) fn distinct_mentions(text: &str) -> Vec<PropertyMention> {
    let mut kept: Vec<PropertyMention> = Vec::new();
    for mention in ontology::property_mentions(text) {
        if kept.last().map_or(true, |last| mention.start >= last.end) {
            kept.push(mention);
        }
    }
    kept
}

/// Run text and table rules over a whole document, then deduplicate.
pub fn extract_document(doc: &SourceDocument, ctx: &ExtractContext) -> Vec<Record> {
    let mut records: Vec<Record> = extractable_spans(doc)
        .flat_map(|span| extract_from_text(span, ctx))
        .collect();
    if ctx.include_tables {
        for table in &doc.tables {
            records.extend(extract_from_table(table, ctx));
        }
    }
    dedup(records)
}

/// Drop duplicates (same material, property, values and page), keeping the
/// record with the longer snippet; on equal length the first one stays.
pub fn dedup(records: Vec<Record>) -> Vec<Record> {
    let mut index: HashMap<_, usize> = HashMap::new();
    let mut kept: Vec<Record> = Vec::with_capacity(records.len());
    for record in records {
        match index.get(&record.dedup_key()) {
            Some(&i) => {
                if record.provenance.snippet.chars().count()
                    > kept[i].provenance.snippet.chars().count()
                {
                    kept[i] = record;
                }
            }
            None => {
                index.insert(record.dedup_key(), kept.len());
                kept.push(record);
            }
        }
    }
    kept
}
