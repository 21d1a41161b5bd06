//! Per-document pipeline: validate → table recovery → extract → normalize →
//! constraints → origin → (barrier) → comparison

use super::cancel::CancellationToken;
use super::config::PipelineConfig;
use super::error::PipelineError;
use crate::compare::build_comparison;
use crate::constraints;
use crate::export::{DocumentExport, FigureManifest};
use crate::extract::{self, ExtractContext};
use crate::model::{BaselineEntry, DocumentMeta, Origin, Record, SourceKind};
use crate::origin;
use crate::source::{
    recover_with_timeout, CommandTableFallback, SourceDocument, SpanSource, TableFallback,
};
use crate::units;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Confidence added once a record's unit converts to SI
pub const SI_CONFIDENCE_BONUS: f64 = 0.15;
/// Ceiling for rule-based record confidence
pub const MAX_RECORD_CONFIDENCE: f64 = 0.99;

/// Runs every stage for one document.
///
/// Holds no per-document state, so one instance can serve a whole batch.
pub struct DocumentPipeline {
    config: PipelineConfig,
    baseline: Arc<Vec<BaselineEntry>>,
    fallback: Option<Arc<dyn TableFallback>>,
}

impl DocumentPipeline {
    /// Pipeline without a baseline. A fallback command named in the config
    /// is used for empty table regions.
    pub fn new(config: PipelineConfig) -> Self {
        let fallback = config.fallback.as_ref().map(|cmd| {
            Arc::new(CommandTableFallback::new(cmd.program.clone(), cmd.args.clone()))
                as Arc<dyn TableFallback>
        });
        Self {
            config,
            baseline: Arc::new(Vec::new()),
            fallback,
        }
    }

    pub fn with_baseline(mut self, baseline: Vec<BaselineEntry>) -> Self {
        self.baseline = Arc::new(baseline);
        self
    }

    /// Replace the table fallback (overrides the configured command).
    pub fn with_fallback(mut self, fallback: Arc<dyn TableFallback>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn baseline(&self) -> &[BaselineEntry] {
        &self.baseline
    }

    /// Load a document from `source` and run it.
    pub async fn run_source(&self, source: &dyn SpanSource) -> Result<DocumentExport, PipelineError> {
        let doc = source.load().await?;
        self.run_document(doc).await
    }

    pub async fn run_document(&self, doc: SourceDocument) -> Result<DocumentExport, PipelineError> {
        self.run_with_cancel(doc, &CancellationToken::new()).await
    }

    /// Run all stages, checking `cancel` between them.
    ///
    /// Malformed input and documents with nothing to extract are fatal for
    /// this document. Fallback failures only add a log line.
    pub async fn run_with_cancel(
        &self,
        mut doc: SourceDocument,
        cancel: &CancellationToken,
    ) -> Result<DocumentExport, PipelineError> {
        let doc_id = doc.doc_id.clone();
        let mut logs: Vec<String> = Vec::new();

        doc.validate()?;
        cancel.checkpoint(&doc_id, "table recovery")?;

        self.recover_tables(&mut doc, &mut logs).await;

        let block_count = extract::extractable_spans(&doc).count();
        let table_bodies = doc.tables.iter().filter(|t| t.has_body()).count();
        let skipped = doc.spans.len() - block_count;
        if skipped > 0 {
            logs.push(format!("skipped {} empty or DOI-only spans", skipped));
        }
        if block_count == 0 && (table_bodies == 0 || !self.config.extract_table_records) {
            warn!(doc_id = %doc_id, "no extractable spans");
            return Err(PipelineError::NoExtractableSpans { doc_id });
        }
        cancel.checkpoint(&doc_id, "extraction")?;

        let ctx = ExtractContext::for_document(&doc, self.config.default_material.as_deref())
            .with_tables(self.config.extract_table_records);
        logs.push(format!("default material: {}", ctx.default_material));
        let mut records = extract::extract_document(&doc, &ctx);
        let from_tables = records
            .iter()
            .filter(|r| r.source == SourceKind::Table)
            .count();
        logs.push(format!(
            "extracted {} records ({} from tables)",
            records.len(),
            from_tables
        ));
        cancel.checkpoint(&doc_id, "normalization")?;

        let unsupported = normalize_all(&mut records);
        logs.push(format!(
            "normalized {} of {} records to SI",
            records.len() - unsupported,
            records.len()
        ));
        if unsupported > 0 {
            logs.push(format!("{} records with {}", unsupported, units::UNSUPPORTED_UNIT));
        }
        cancel.checkpoint(&doc_id, "constraint checks")?;

        let blocked = constraints::check_all(&mut records);
        logs.push(format!(
            "constraints: {} hard_fail, {} with soft_warn",
            blocked,
            records
                .iter()
                .filter(|r| r.constraints.as_ref().is_some_and(|c| !c.soft_warn.is_empty()))
                .count()
        ));
        cancel.checkpoint(&doc_id, "origin classification")?;

        for record in records.iter_mut() {
            origin::classify_record(record);
        }
        logs.push(origin_summary(&records));
        cancel.checkpoint(&doc_id, "comparison")?;

        // Every record has finished the per-record stages at this point
        let comparison = build_comparison(&records, &self.baseline);
        logs.push(format!("comparison: {} rows", comparison.len()));

        info!(
            doc_id = %doc_id,
            records = records.len(),
            hard_fails = blocked,
            rows = comparison.len(),
            "document processed"
        );

        Ok(DocumentExport {
            doc_id: doc_id.clone(),
            document: DocumentMeta {
                doc_id,
                page_count: doc.effective_page_count(),
                block_count,
                table_count: doc.tables.len(),
                figure_count: doc.figures.len(),
            },
            records,
            comparison,
            figures: FigureManifest::from_regions(&doc.figures),
            tables: doc.tables,
            logs,
        })
    }

    /// Ask the fallback for every table without a body. Failures keep the
    /// caption only.
    async fn recover_tables(&self, doc: &mut SourceDocument, logs: &mut Vec<String>) {
        let timeout = self.config.fallback_timeout();
        for table in doc.tables.iter_mut().filter(|t| !t.has_body()) {
            let fallback = match (&self.fallback, self.config.reconstruct_tables) {
                (Some(fallback), true) => fallback,
                _ => {
                    logs.push(format!("table {}: no body; caption only", table.table_id));
                    continue;
                }
            };
            match recover_with_timeout(fallback.as_ref(), table, timeout).await {
                Ok(body) if body.rows.is_empty() => {
                    logs.push(format!(
                        "table {}: fallback {} returned no rows; caption only",
                        table.table_id,
                        fallback.id()
                    ));
                }
                Ok(body) => {
                    debug!(table_id = %table.table_id, rows = body.rows.len(), "table body recovered");
                    logs.push(format!(
                        "table {}: {} rows recovered by {}",
                        table.table_id,
                        body.rows.len(),
                        fallback.id()
                    ));
                    if !body.header.is_empty() {
                        table.header = body.header;
                    }
                    table.rows = body.rows;
                }
                Err(e) => {
                    warn!(doc_id = %doc.doc_id, table_id = %table.table_id, error = %e, "table fallback failed");
                    logs.push(format!(
                        "table {}: fallback {} failed ({}); caption only",
                        table.table_id,
                        fallback.id(),
                        e
                    ));
                }
            }
        }
    }
}

/// Normalize every record and raise the confidence of converted ones.
/// Returns the number of records left without SI values.
fn normalize_all(records: &mut [Record]) -> usize {
    let mut unsupported = 0;
    for record in records.iter_mut() {
        units::normalize_record(record);
        if record.has_si() {
            record.confidence = (record.confidence + SI_CONFIDENCE_BONUS).min(MAX_RECORD_CONFIDENCE);
        } else {
            unsupported += 1;
        }
    }
    unsupported
}

fn origin_summary(records: &[Record]) -> String {
    let count = |o: Origin| records.iter().filter(|r| r.origin == Some(o)).count();
    format!(
        "origin: this_work={} literature={} mixed={} unclear={}",
        count(Origin::ThisWork),
        count(Origin::Literature),
        count(Origin::Mixed),
        count(Origin::Unclear)
    )
}
