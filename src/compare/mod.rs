//! Comparison & novelty aggregation
//!
//! Runs after every record of a document is normalized, checked and
//! classified. Rows are derived data: rebuilding from the same records and
//! baseline gives the same rows.

mod baseline;
mod novelty;
mod summary;

pub use baseline::{load_baseline, parse_baseline, BaselineError, BaselineFormat};
pub use novelty::novelty_flag;
pub use summary::{
    baseline_interval, format_value, summarize_baseline, summarize_records, RangeSummary,
    RELATIVE_TOLERANCE,
};

use crate::model::{BaselineEntry, ComparisonRow, Record};
use std::collections::{BTreeMap, BTreeSet};

type GroupKey = (String, String, String);

/// Build one row per (material, property, category) group.
///
/// Records with a hard failure are left out. Baseline entries match on
/// exact material and property.
pub fn build_comparison(records: &[Record], baseline: &[BaselineEntry]) -> Vec<ComparisonRow> {
    let mut groups: BTreeMap<GroupKey, Vec<&Record>> = BTreeMap::new();
    for record in records.iter().filter(|r| !r.is_blocked()) {
        groups
            .entry((
                record.material.clone(),
                record.property.clone(),
                record.category.clone(),
            ))
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|((material, property, category), members)| {
            let own: Vec<&Record> = members
                .iter()
                .copied()
                .filter(|r| r.origin.is_some_and(|o| o.counts_as_this_work()))
                .collect();
            let cited: Vec<&Record> = members
                .iter()
                .copied()
                .filter(|r| r.origin.is_some_and(|o| o.counts_as_literature()))
                .collect();
            let matching: Vec<&BaselineEntry> = baseline
                .iter()
                .filter(|b| b.material == material && b.property == property)
                .collect();

            let own_range = summarize_records(&own);
            let cited_range = summarize_records(&cited);
            let baseline_intervals: Vec<RangeSummary> =
                matching.iter().map(|b| baseline_interval(b)).collect();
            let baseline_range = summarize_baseline(&matching);

            let paper_citations: BTreeSet<String> = cited
                .iter()
                .flat_map(|r| r.citations.iter().cloned())
                .collect();

            ComparisonRow {
                novelty_flag: novelty_flag(
                    own_range.as_ref(),
                    cited_range.as_ref(),
                    &baseline_intervals,
                ),
                unit_space: own_range
                    .as_ref()
                    .or(cited_range.as_ref())
                    .map(|r| r.space),
                this_work: own_range.as_ref().map(RangeSummary::display),
                paper_cited_literature: cited_range.as_ref().map(RangeSummary::display),
                external_baseline: baseline_range.as_ref().map(RangeSummary::display),
                paper_citations: paper_citations.into_iter().collect(),
                material,
                property,
                category,
            }
        })
        .collect()
}
