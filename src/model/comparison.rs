//! Comparison rows and external baseline entries

use serde::{Deserialize, Serialize};

/// How a paper's own values sit against cited literature and the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoveltyFlag {
    None,
    PossibleOutlierHigh,
    PossibleOutlierLow,
    WithinBaseline,
    NoBaseline,
}

impl NoveltyFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PossibleOutlierHigh => "possible_outlier_high",
            Self::PossibleOutlierLow => "possible_outlier_low",
            Self::WithinBaseline => "within_baseline",
            Self::NoBaseline => "no_baseline",
        }
    }
}

impl std::fmt::Display for NoveltyFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which unit space a formatted range was computed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSpace {
    Si,
    Original,
}

/// Paper-centric comparison for one (material, property, category) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub material: String,
    pub property: String,
    pub category: String,
    pub this_work: Option<String>,
    pub paper_cited_literature: Option<String>,
    pub external_baseline: Option<String>,
    pub novelty_flag: NoveltyFlag,
    /// Unit space of `this_work` (falls back to the literature range's space)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_space: Option<UnitSpace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paper_citations: Vec<String>,
}

/// One externally supplied reference value. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub material: String,
    pub property: String,
    #[serde(alias = "value")]
    pub value_min: f64,
    #[serde(default)]
    pub value_max: Option<f64>,
    pub unit_si: String,
}

impl BaselineEntry {
    pub fn new(
        material: impl Into<String>,
        property: impl Into<String>,
        value_min: f64,
        value_max: f64,
        unit_si: impl Into<String>,
    ) -> Self {
        Self {
            material: material.into(),
            property: property.into(),
            value_min,
            value_max: Some(value_max),
            unit_si: unit_si.into(),
        }
    }

    pub fn range(&self) -> (f64, f64) {
        (self.value_min, self.value_max.unwrap_or(self.value_min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn novelty_flag_serializes_snake_case() {
        let json = serde_json::to_string(&NoveltyFlag::PossibleOutlierHigh).unwrap();
        assert_eq!(json, "\"possible_outlier_high\"");
        assert_eq!(NoveltyFlag::NoBaseline.to_string(), "no_baseline");
    }

    #[test]
    fn baseline_accepts_point_value_alias() {
        let entry: BaselineEntry = serde_json::from_str(
            r#"{"material":"PEO","property":"ionic_conductivity","value":1e-5,"unit_si":"S/m"}"#,
        )
        .unwrap();
        assert_eq!(entry.range(), (1e-5, 1e-5));
    }
}
