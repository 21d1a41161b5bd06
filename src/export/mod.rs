//! Export surface: the document export object and its flat projections

mod figures;

pub use figures::{FigureImage, FigureKind, FigureManifest};

use crate::model::{ComparisonRow, DocumentMeta, Record};
use crate::source::TableRegion;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const RECORD_COLUMNS: [&str; 11] = [
    "material",
    "category",
    "property",
    "value_min",
    "value_max",
    "unit_original",
    "origin",
    "confidence",
    "page",
    "citations",
    "hard_fail",
];

pub const COMPARISON_COLUMNS: [&str; 7] = [
    "material",
    "property",
    "category",
    "this_work",
    "paper_cited_literature",
    "external_baseline",
    "novelty_flag",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Everything produced for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExport {
    pub doc_id: String,
    pub document: DocumentMeta,
    pub records: Vec<Record>,
    pub comparison: Vec<ComparisonRow>,
    pub tables: Vec<TableRegion>,
    pub figures: FigureManifest,
    pub logs: Vec<String>,
}

fn opt_num(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Write the records projection as CSV.
pub fn write_records_csv<W: Write>(records: &[Record], out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(RECORD_COLUMNS)?;
    for r in records {
        let hard_fail = r
            .constraints
            .as_ref()
            .map(|c| c.hard_fail.iter().cloned().collect::<Vec<_>>().join("; "))
            .unwrap_or_default();
        writer.write_record([
            r.material.clone(),
            r.category.clone(),
            r.property.clone(),
            opt_num(r.value_min),
            opt_num(r.value_max),
            r.unit_original.clone(),
            r.origin.map(|o| o.as_str().to_string()).unwrap_or_default(),
            format!("{:.2}", r.confidence),
            r.provenance.page.to_string(),
            r.citations.join("; "),
            hard_fail,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the comparison projection as CSV.
pub fn write_comparison_csv<W: Write>(rows: &[ComparisonRow], out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(COMPARISON_COLUMNS)?;
    for row in rows {
        writer.write_record([
            row.material.as_str(),
            row.property.as_str(),
            row.category.as_str(),
            row.this_work.as_deref().unwrap_or(""),
            row.paper_cited_literature.as_deref().unwrap_or(""),
            row.external_baseline.as_deref().unwrap_or(""),
            row.novelty_flag.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

impl DocumentExport {
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn records_csv(&self) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        write_records_csv(&self.records, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn comparison_csv(&self) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        write_comparison_csv(&self.comparison, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Records that would be excluded from aggregation
    pub fn blocked_records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.is_blocked())
    }

    /// Write `<doc_id>.json`, `<doc_id>_records.csv` and
    /// `<doc_id>_comparison.csv` into `dir`.
    pub fn write_outputs(&self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(dir)?;
        let stem = sanitize_file_stem(&self.doc_id);

        let json_path = dir.join(format!("{}.json", stem));
        std::fs::write(&json_path, self.to_json_pretty()?)?;

        let records_path = dir.join(format!("{}_records.csv", stem));
        write_records_csv(&self.records, std::fs::File::create(&records_path)?)?;

        let comparison_path = dir.join(format!("{}_comparison.csv", stem));
        write_comparison_csv(&self.comparison, std::fs::File::create(&comparison_path)?)?;

        Ok(vec![json_path, records_path, comparison_path])
    }
}

fn sanitize_file_stem(doc_id: &str) -> String {
    let stem: String = doc_id
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.trim_matches('.').is_empty() {
        "document".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstraintReport, NoveltyFlag, Origin, Provenance, SourceKind};

    fn export() -> DocumentExport {
        let mut record = Record::new(
            "PEO",
            "ionic_conductivity",
            "Electrochemical",
            Provenance::new(3, "PEO gave 1e-4 S/cm [2, 3]."),
            SourceKind::Text,
        )
        .with_values(1e-4, 1e-4)
        .with_unit("S/cm")
        .with_citations(vec!["[2, 3]".into()])
        .with_confidence(0.65);
        record.origin = Some(Origin::Literature);
        let mut report = ConstraintReport::new();
        report.fail("inverted_range");
        report.fail("unit_dimension_mismatch:temperature!=conductivity");
        record.assign_constraints(report);

        DocumentExport {
            doc_id: "paper/7".into(),
            document: DocumentMeta {
                doc_id: "paper/7".into(),
                page_count: 9,
                block_count: 1,
                table_count: 0,
                figure_count: 0,
            },
            records: vec![record],
            comparison: vec![ComparisonRow {
                material: "PEO".into(),
                property: "ionic_conductivity".into(),
                category: "Electrochemical".into(),
                this_work: None,
                paper_cited_literature: Some("0.0100 S/m".into()),
                external_baseline: None,
                novelty_flag: NoveltyFlag::None,
                unit_space: None,
                paper_citations: vec!["[2, 3]".into()],
            }],
            tables: vec![],
            figures: FigureManifest::default(),
            logs: vec!["extracted 1 records".into()],
        }
    }

    #[test]
    fn records_csv_has_exact_columns() {
        let csv = export().records_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "material,category,property,value_min,value_max,unit_original,origin,confidence,page,citations,hard_fail"
        );
        assert_eq!(
            lines.next().unwrap(),
            "PEO,Electrochemical,ionic_conductivity,0.0001,0.0001,S/cm,literature,0.65,3,\"[2, 3]\",inverted_range; unit_dimension_mismatch:temperature!=conductivity"
        );
    }

    #[test]
    fn comparison_csv_has_exact_columns() {
        let csv = export().comparison_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "material,property,category,this_work,paper_cited_literature,external_baseline,novelty_flag"
        );
        assert_eq!(
            lines.next().unwrap(),
            "PEO,ionic_conductivity,Electrochemical,,0.0100 S/m,,none"
        );
    }

    #[test]
    fn json_has_stable_top_level_fields() {
        let value: serde_json::Value =
            serde_json::from_str(&export().to_json_pretty().unwrap()).unwrap();
        for key in ["doc_id", "records", "comparison", "tables", "figures", "logs"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value["figures"]["images"].is_array());
    }

    #[test]
    fn writes_three_files_with_safe_names() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export().write_outputs(dir.path()).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("paper_7.json"));
        assert!(paths.iter().all(|p| p.exists()));
        let back: DocumentExport =
            serde_json::from_str(&std::fs::read_to_string(&paths[0]).unwrap()).unwrap();
        assert_eq!(back, export());
    }

    #[test]
    fn blocked_records_are_listed() {
        assert_eq!(export().blocked_records().count(), 1);
    }
}
