//! Novelty flag rule

use super::summary::{approx_le, RangeSummary};
use crate::model::NoveltyFlag;

/// Place the paper's own range against cited literature and baseline intervals.
///
/// Priority: no reference at all → `no_baseline`; overlap with any
/// reference → `within_baseline`; above all → `possible_outlier_high`;
/// below all → `possible_outlier_low`; anything else (including a missing
/// own range or references in another unit) → `none`.
pub fn novelty_flag(
    this_work: Option<&RangeSummary>,
    literature: Option<&RangeSummary>,
    baseline: &[RangeSummary],
) -> NoveltyFlag {
    if literature.is_none() && baseline.is_empty() {
        return NoveltyFlag::NoBaseline;
    }
    let Some(own) = this_work else {
        return NoveltyFlag::None;
    };

    let references: Vec<&RangeSummary> = literature
        .into_iter()
        .chain(baseline.iter())
        .filter(|r| r.comparable(own))
        .collect();
    if references.is_empty() {
        return NoveltyFlag::None;
    }

    if references.iter().any(|r| own.overlaps(r)) {
        return NoveltyFlag::WithinBaseline;
    }
    let union_hi = references.iter().map(|r| r.hi).fold(f64::NEG_INFINITY, f64::max);
    let union_lo = references.iter().map(|r| r.lo).fold(f64::INFINITY, f64::min);
    if !approx_le(own.lo, union_hi) {
        NoveltyFlag::PossibleOutlierHigh
    } else if !approx_le(union_lo, own.hi) {
        NoveltyFlag::PossibleOutlierLow
    } else {
        NoveltyFlag::None
    }
}
