//! File-backed sources, baselines, exports and batch isolation

mod common;

use common::*;
use ironclad::source::MockTableFallback;
use ironclad::{
    load_baseline, BatchRunner, DocumentExport, JsonSpanSource, NoveltyFlag, PipelineConfig,
    PipelineError, SourceError, SpanSource, TableRegion,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const LAYOUT: &str = r#"{
  "page_count": 3,
  "pages": [
    { "page": 1,
      "spans": [
        { "text": "In this work, the ionic conductivity of PEO reached 1.2×10⁻⁴ S/cm at 25 °C.",
          "bbox": { "x0": 72.0, "y0": 100.0, "x1": 520.0, "y1": 140.0 } }
      ] },
    { "page": 2,
      "tables": [ { "caption": "Table 1. Scanned conductivity data" } ],
      "figures": [ { "caption": "Figure 2. Nyquist plots of PEO electrolytes" } ] }
  ]
}"#;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[tokio::test]
async fn layout_file_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "paper-7.json", LAYOUT);

    let export = pipeline()
        .run_source(&JsonSpanSource::new(&path))
        .await
        .unwrap();

    assert_eq!(export.doc_id, "paper-7");
    assert_eq!(export.document.page_count, 3);
    assert_eq!(export.document.table_count, 1);
    assert_eq!(export.records.len(), 1);
    assert!(export.records[0].provenance.bbox.is_some());
    assert_eq!(export.tables[0].table_id, "T1");
    assert_eq!(export.figures.images.len(), 1);
    assert_eq!(export.figures.images[0].figure_id, "F1");
    assert!(export
        .logs
        .iter()
        .any(|l| l == "table T1: no body; caption only"));
}

#[tokio::test]
async fn export_files_reload_identically() {
    let dir = tempfile::tempdir().unwrap();
    let export = run_with_baseline(electrolyte_paper(), electrolyte_baseline()).await;
    let paths = export.write_outputs(&dir.path().join("out")).unwrap();

    let json = std::fs::read_to_string(&paths[0]).unwrap();
    let reloaded: DocumentExport = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, export);

    let records_csv = std::fs::read_to_string(&paths[1]).unwrap();
    assert_eq!(records_csv, export.records_csv().unwrap());
    assert_eq!(records_csv.lines().count(), export.records.len() + 1);
    let comparison_csv = std::fs::read_to_string(&paths[2]).unwrap();
    assert!(comparison_csv.contains("possible_outlier_high"));
}

#[tokio::test]
async fn csv_baseline_drives_novelty() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "baseline.csv",
        "material,property,value_min,value_max,unit_si\nPEO,ionic_conductivity,1e-5,8e-5,S/cm\n",
    );
    let baseline = load_baseline(&path).unwrap();
    assert_eq!(baseline, electrolyte_baseline());

    let export = run_with_baseline(electrolyte_paper(), baseline).await;
    let row = export
        .comparison
        .iter()
        .find(|r| r.property == "ionic_conductivity")
        .unwrap();
    assert_eq!(row.novelty_flag, NoveltyFlag::PossibleOutlierHigh);
}

#[tokio::test]
async fn failing_fallback_keeps_caption_and_records() {
    let doc = document(
        "fb",
        &[(1, "We measured an ionic conductivity of 2.0×10⁻⁴ S/cm at 30 °C.")],
    )
    .with_table(TableRegion::new("T1", 1).with_caption("Table 1. Image-only table"));
    let export = pipeline()
        .with_fallback(Arc::new(MockTableFallback::failing("ocr crashed")))
        .run_document(doc)
        .await
        .unwrap();

    assert_eq!(export.records.len(), 1);
    assert!(export.tables[0].rows.is_empty());
    assert_eq!(export.tables[0].caption, "Table 1. Image-only table");
    assert!(export
        .logs
        .iter()
        .any(|l| l == "table T1: fallback mock failed (fallback failed: ocr crashed); caption only"));
}

#[tokio::test]
async fn slow_fallback_is_bounded() {
    let doc = document("slow", &[(1, "Tg was 210 K by DSC.")])
        .with_table(TableRegion::new("T9", 1).with_caption("Table 9."));
    let pipeline = ironclad::DocumentPipeline::new(PipelineConfig::default().with_fallback_timeout(1))
        .with_fallback(Arc::new(MockTableFallback::hanging()));

    let export = tokio::time::timeout(Duration::from_secs(10), pipeline.run_document(doc))
        .await
        .expect("fallback timeout should bound the document")
        .unwrap();
    assert!(export
        .logs
        .iter()
        .any(|l| l.starts_with("table T9: fallback mock failed (fallback timed out")));
}

#[tokio::test]
async fn batch_isolates_bad_documents() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.json", LAYOUT);
    let broken = write(dir.path(), "broken.json", "{ \"pages\": [ { \"page\": 1, ");
    let page_zero = write(
        dir.path(),
        "zero.json",
        r#"{ "pages": [ { "page": 0, "spans": [ { "text": "Tg was 210 K." } ] } ] }"#,
    );
    let missing = dir.path().join("missing.json");

    let sources: Vec<Box<dyn SpanSource>> = [&good, &broken, &page_zero, &missing]
        .into_iter()
        .map(|p| Box::new(JsonSpanSource::new(p)) as Box<dyn SpanSource>)
        .collect();
    let runner = BatchRunner::new(pipeline()).with_concurrency(2);
    let outcomes = runner.run(sources).await;

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(PipelineError::Source(SourceError::Json(_)))
    ));
    assert!(matches!(
        outcomes[2].result,
        Err(PipelineError::Source(SourceError::Malformed(_)))
    ));
    assert!(matches!(
        outcomes[3].result,
        Err(PipelineError::Source(SourceError::Io(_)))
    ));
    assert_eq!(outcomes[3].source_id, "missing");
}

#[tokio::test]
async fn batch_results_match_single_runs() {
    let docs = vec![
        electrolyte_paper(),
        document("other", &[(1, "Herein, the Young's modulus of PMMA was 3.1 GPa.")]),
    ];
    let singles: Vec<DocumentExport> = {
        let mut out = Vec::new();
        for doc in docs.clone() {
            out.push(run(doc).await);
        }
        out
    };

    let sources: Vec<Box<dyn SpanSource>> = docs
        .into_iter()
        .map(|d| Box::new(d) as Box<dyn SpanSource>)
        .collect();
    let outcomes = BatchRunner::new(pipeline()).run(sources).await;
    for (outcome, single) in outcomes.iter().zip(&singles) {
        let export = outcome.result.as_ref().unwrap();
        assert_eq!(export.to_json_pretty().unwrap(), single.to_json_pretty().unwrap());
    }
}
