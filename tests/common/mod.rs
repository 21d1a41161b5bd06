//! Shared builders for integration tests

#![allow(dead_code)]

use ironclad::{
    BaselineEntry, DocumentExport, DocumentPipeline, PipelineConfig, Record, SourceDocument,
    TextSpan,
};

/// Document with one span per `(page, text)` pair
pub fn document(doc_id: &str, spans: &[(u32, &str)]) -> SourceDocument {
    spans
        .iter()
        .fold(SourceDocument::new(doc_id), |doc, (page, text)| {
            doc.with_span(TextSpan::new(*page, *text))
        })
}

/// A paper with an own measurement, a cited range and a mixed sentence
pub fn electrolyte_paper() -> SourceDocument {
    document(
        "peo-electrolyte",
        &[
            (1, "doi: 10.1000/xyz123"),
            (
                2,
                "In this work, the ionic conductivity of PEO reached 1.2×10⁻⁴ S/cm at 25 °C.",
            ),
            (
                3,
                "Previously reported PEO electrolytes showed an ionic conductivity between 3.0×10⁻⁵ and 9.0×10⁻⁵ S/cm at 25 °C [12].",
            ),
            (4, "We measured a Tg of 210 K for PEO, while Ref. 3 reported 205 K."),
        ],
    )
}

pub fn electrolyte_baseline() -> Vec<BaselineEntry> {
    vec![BaselineEntry::new(
        "PEO",
        "ionic_conductivity",
        1.0e-5,
        8.0e-5,
        "S/cm",
    )]
}

pub fn pipeline() -> DocumentPipeline {
    DocumentPipeline::new(PipelineConfig::default())
}

pub async fn run(doc: SourceDocument) -> DocumentExport {
    pipeline()
        .run_document(doc)
        .await
        .expect("pipeline should succeed")
}

pub async fn run_with_baseline(doc: SourceDocument, baseline: Vec<BaselineEntry>) -> DocumentExport {
    pipeline()
        .with_baseline(baseline)
        .run_document(doc)
        .await
        .expect("pipeline should succeed")
}

/// Records whose snippet contains `needle`
pub fn records_with<'a>(export: &'a DocumentExport, needle: &str) -> Vec<&'a Record> {
    export
        .records
        .iter()
        .filter(|r| r.provenance.snippet.contains(needle))
        .collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    assert!(
        ((actual - expected) / scale).abs() < 1e-9,
        "{} is not within 1e-9 of {}",
        actual,
        expected
    );
}
