//! Record: one extracted property claim with its proof trail

use crate::source::BoundingBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Authorship origin of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The paper's own measurement
    ThisWork,
    /// A cited prior result
    Literature,
    /// Both self-attribution and citation cues
    Mixed,
    /// No usable cue
    Unclear,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThisWork => "this_work",
            Self::Literature => "literature",
            Self::Mixed => "mixed",
            Self::Unclear => "unclear",
        }
    }

    /// Whether the record feeds the `this_work` column of a comparison row.
    pub fn counts_as_this_work(&self) -> bool {
        matches!(self, Self::ThisWork | Self::Mixed)
    }

    /// Whether the record feeds the `paper_cited_literature` column.
    pub fn counts_as_literature(&self) -> bool {
        matches!(self, Self::Literature | Self::Mixed)
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Origin {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "this_work" => Ok(Self::ThisWork),
            "literature" => Ok(Self::Literature),
            "mixed" => Ok(Self::Mixed),
            "unclear" => Ok(Self::Unclear),
            _ => Err(format!("unknown origin: {}", s)),
        }
    }
}

/// Where a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Text,
    Table,
}

/// Page and verbatim source text backing a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// 1-based page number
    pub page: u32,
    /// Minimal enclosing sentence (or table caption + row) as it appears in the source
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
}

impl Provenance {
    pub fn new(page: u32, snippet: impl Into<String>) -> Self {
        Self {
            page,
            snippet: snippet.into(),
            bbox: None,
            table_id: None,
        }
    }

    pub fn with_bbox(mut self, bbox: Option<BoundingBox>) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }
}

/// How an original value was mapped onto its canonical unit.
///
/// `si = (original + offset) * factor`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationTrace {
    pub from: String,
    pub to: String,
    pub dimension: String,
    pub factor: f64,
    pub offset: f64,
}

/// Outcome of the constraint checks for one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintReport {
    #[serde(default)]
    pub hard_pass: BTreeSet<String>,
    #[serde(default)]
    pub hard_fail: BTreeSet<String>,
    #[serde(default)]
    pub soft_warn: BTreeSet<String>,
}

impl ConstraintReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(&mut self, check: impl Into<String>) {
        self.hard_pass.insert(check.into());
    }

    pub fn fail(&mut self, check: impl Into<String>) {
        self.hard_fail.insert(check.into());
    }

    pub fn warn(&mut self, check: impl Into<String>) {
        self.soft_warn.insert(check.into());
    }

    /// True if any hard check failed; the record then stays out of aggregation.
    pub fn is_blocking(&self) -> bool {
        !self.hard_fail.is_empty()
    }
}

/// Classifier verdict plus the cues that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginAssessment {
    pub origin: Origin,
    pub confidence: f64,
    pub self_score: f64,
    pub citation_score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub self_cues: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citation_cues: Vec<String>,
}

/// One extracted claim.
///
/// Created once per extraction pass. After normalization only `origin`
/// (and its rationale) and `constraints` change, each exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub material: String,
    pub property: String,
    pub category: String,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
    pub unit_original: String,
    pub value_si_min: Option<f64>,
    pub value_si_max: Option<f64>,
    pub unit_si: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    pub provenance: Provenance,
    pub citations: Vec<String>,
    pub origin: Option<Origin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_rationale: Option<OriginAssessment>,
    pub confidence: f64,
    pub constraints: Option<ConstraintReport>,
    pub method: String,
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technique: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<NormalizationTrace>,
}

impl Record {
    /// Create an unnormalized, unclassified record.
    pub fn new(
        material: impl Into<String>,
        property: impl Into<String>,
        category: impl Into<String>,
        provenance: Provenance,
        source: SourceKind,
    ) -> Self {
        Self {
            material: material.into(),
            property: property.into(),
            category: category.into(),
            value_min: None,
            value_max: None,
            unit_original: String::new(),
            value_si_min: None,
            value_si_max: None,
            unit_si: None,
            dimension: None,
            provenance,
            citations: Vec::new(),
            origin: None,
            origin_rationale: None,
            confidence: 0.0,
            constraints: None,
            method: String::new(),
            source,
            technique: None,
            normalization: None,
        }
    }

    pub fn with_values(mut self, min: f64, max: f64) -> Self {
        self.value_min = Some(min);
        self.value_max = Some(max);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit_original = unit.into();
        self
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_technique(mut self, technique: Option<String>) -> Self {
        self.technique = technique;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Attach SI values, unit and trace together so they are never half-set.
    pub fn apply_si(&mut self, min: Option<f64>, max: Option<f64>, trace: NormalizationTrace) {
        self.value_si_min = min;
        self.value_si_max = max;
        self.unit_si = Some(trace.to.clone());
        self.dimension = Some(trace.dimension.clone());
        self.normalization = Some(trace);
    }

    /// Append a clause to the free-text method description.
    pub fn note_method(&mut self, note: &str) {
        if self.method.is_empty() {
            self.method = note.to_string();
        } else {
            self.method.push_str("; ");
            self.method.push_str(note);
        }
    }

    /// Set the origin. Returns false (and leaves the record untouched) if already set.
    pub fn assign_origin(&mut self, assessment: OriginAssessment) -> bool {
        if self.origin.is_some() {
            return false;
        }
        self.origin = Some(assessment.origin);
        self.origin_rationale = Some(assessment);
        true
    }

    /// Set the constraint report. Returns false if already set.
    pub fn assign_constraints(&mut self, report: ConstraintReport) -> bool {
        if self.constraints.is_some() {
            return false;
        }
        self.constraints = Some(report);
        true
    }

    pub fn has_si(&self) -> bool {
        self.value_si_min.is_some() && self.unit_si.is_some()
    }

    /// True when a hard constraint failed.
    pub fn is_blocked(&self) -> bool {
        self.constraints
            .as_ref()
            .map(ConstraintReport::is_blocking)
            .unwrap_or(false)
    }

    /// `(min, max)` in SI, ordered as stored.
    pub fn si_range(&self) -> Option<(f64, f64)> {
        let min = self.value_si_min?;
        Some((min, self.value_si_max.unwrap_or(min)))
    }

    /// `(min, max)` in the original unit, ordered as stored.
    pub fn original_range(&self) -> Option<(f64, f64)> {
        let min = self.value_min?;
        Some((min, self.value_max.unwrap_or(min)))
    }

    /// Identity used for deduplication: material, property, values, page.
    pub fn dedup_key(&self) -> (String, String, Option<u64>, Option<u64>, u32) {
        (
            self.material.clone(),
            self.property.clone(),
            self.value_min.map(f64::to_bits),
            self.value_max.map(f64::to_bits),
            self.provenance.page,
        )
    }
}
