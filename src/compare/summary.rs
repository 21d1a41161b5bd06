//! Min–max range summaries and their display strings

use crate::model::{BaselineEntry, Record, UnitSpace};
use crate::units;
use std::collections::BTreeMap;

/// Relative tolerance for range comparisons
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

/// A closed interval in one unit
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSummary {
    pub lo: f64,
    pub hi: f64,
    pub unit: String,
    pub space: UnitSpace,
}

/// `a <= b` within [`RELATIVE_TOLERANCE`].
pub fn approx_le(a: f64, b: f64) -> bool {
    a <= b + RELATIVE_TOLERANCE * a.abs().max(b.abs())
}

impl RangeSummary {
    fn from_points(points: &[(f64, f64)], unit: String, space: UnitSpace) -> Option<Self> {
        let lo = points
            .iter()
            .map(|(a, b)| a.min(*b))
            .fold(f64::INFINITY, f64::min);
        let hi = points
            .iter()
            .map(|(a, b)| a.max(*b))
            .fold(f64::NEG_INFINITY, f64::max);
        (lo.is_finite() && hi.is_finite()).then_some(Self {
            lo,
            hi,
            unit,
            space,
        })
    }

    /// Same unit and space, so the intervals can be compared.
    pub fn comparable(&self, other: &Self) -> bool {
        self.unit == other.unit && self.space == other.space
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        approx_le(self.lo, other.hi) && approx_le(other.lo, self.hi)
    }

    pub fn display(&self) -> String {
        let suffix = match self.space {
            UnitSpace::Si => "",
            UnitSpace::Original => " (original units)",
        };
        if self.lo == self.hi {
            format!("{} {}{}", format_value(self.lo), self.unit, suffix)
        } else {
            format!(
                "{}–{} {}{}",
                format_value(self.lo),
                format_value(self.hi),
                self.unit,
                suffix
            )
        }
    }
}

/// Compact number formatting for comparison cells.
pub fn format_value(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    let ax = x.abs();
    if !(1e-3..1e4).contains(&ax) {
        format!("{:.3e}", x)
    } else if ax >= 100.0 {
        format!("{:.2}", x)
    } else if ax >= 1.0 {
        format!("{:.3}", x)
    } else {
        format!("{:.4}", x)
    }
}

/// The most frequent unit among `points`; ties go to the smallest spelling.
fn dominant_unit(points: &BTreeMap<String, Vec<(f64, f64)>>) -> Option<&String> {
    points
        .iter()
        .max_by(|(ua, a), (ub, b)| a.len().cmp(&b.len()).then(ub.cmp(ua)))
        .map(|(unit, _)| unit)
}

fn summarize_points(
    points: BTreeMap<String, Vec<(f64, f64)>>,
    space: UnitSpace,
) -> Option<RangeSummary> {
    let unit = dominant_unit(&points)?.clone();
    RangeSummary::from_points(&points[&unit], unit, space)
}

/// Range over records, in SI if any record has SI values, else in the
/// original unit.
pub fn summarize_records(records: &[&Record]) -> Option<RangeSummary> {
    let mut si: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for r in records {
        if let (Some(range), Some(unit)) = (r.si_range(), &r.unit_si) {
            si.entry(unit.clone()).or_default().push(range);
        }
    }
    if !si.is_empty() {
        return summarize_points(si, UnitSpace::Si);
    }

    let mut original: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for r in records {
        if let Some(range) = r.original_range() {
            if !r.unit_original.is_empty() {
                original.entry(r.unit_original.clone()).or_default().push(range);
            }
        }
    }
    summarize_points(original, UnitSpace::Original)
}

/// One baseline entry as an SI interval. Units without a conversion rule
/// are kept as given.
pub fn baseline_interval(entry: &BaselineEntry) -> RangeSummary {
    let (lo, hi) = entry.range();
    match units::lookup(&entry.unit_si) {
        Some(trace) => RangeSummary {
            lo: units::to_si(lo, &trace).min(units::to_si(hi, &trace)),
            hi: units::to_si(lo, &trace).max(units::to_si(hi, &trace)),
            unit: trace.to,
            space: UnitSpace::Si,
        },
        None => RangeSummary {
            lo: lo.min(hi),
            hi: lo.max(hi),
            unit: entry.unit_si.clone(),
            space: UnitSpace::Si,
        },
    }
}

/// Range over baseline entries, converted to SI.
pub fn summarize_baseline(entries: &[&BaselineEntry]) -> Option<RangeSummary> {
    let mut points: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for entry in entries {
        let interval = baseline_interval(entry);
        points
            .entry(interval.unit)
            .or_default()
            .push((interval.lo, interval.hi));
    }
    summarize_points(points, UnitSpace::Si)
}
