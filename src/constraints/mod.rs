//! Constraint checks: dimensional, range, cross-field, context
//!
//! Checks are rows in an ordered table. Each returns an outcome; none can
//! fail the pipeline. Cross-record checks run over the whole document
//! before reports are attached, so every record gets its report exactly once.

mod cross;
mod ranges;

pub use cross::{cross_record_warnings, DISPERSITY_LT_1, MW_LT_MN};
pub use ranges::{plausible_range, PlausibleRange, PLAUSIBLE_RANGES};

use crate::model::{ConstraintReport, Record};
use crate::ontology::{self, PropertySpec};

pub const INVERTED_RANGE: &str = "inverted_range";
pub const MISSING_TEMPERATURE_CONTEXT: &str = "missing_temperature_context";

/// Result of one check on one record
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pass(String),
    Fail(String),
    Warn(String),
    /// Check does not apply
    Skip,
}

type Check = fn(&Record, Option<&'static PropertySpec>) -> Outcome;

const CHECKS: &[(&str, Check)] = &[
    ("dimension", check_dimension),
    ("range_order", check_range_order),
    ("plausibility", check_plausibility),
    ("temperature_context", check_temperature_context),
];

fn check_dimension(record: &Record, spec: Option<&'static PropertySpec>) -> Outcome {
    let Some(spec) = spec else {
        return Outcome::Skip;
    };
    match &record.dimension {
        Some(observed) if spec.accepts_dimension(observed) => {
            Outcome::Pass("unit_dimension_consistent".into())
        }
        Some(observed) => Outcome::Fail(format!(
            "unit_dimension_mismatch:{}!={}",
            spec.expected_dimension(),
            observed
        )),
        None if !record.unit_original.is_empty() => {
            Outcome::Warn(format!("unit_not_normalized:{}", record.unit_original))
        }
        None => Outcome::Skip,
    }
}

fn check_range_order(record: &Record, _spec: Option<&'static PropertySpec>) -> Outcome {
    match (record.value_min, record.value_max) {
        (Some(min), Some(max)) if max < min => Outcome::Fail(INVERTED_RANGE.into()),
        (Some(_), Some(_)) => Outcome::Pass("range_ordered".into()),
        _ => Outcome::Skip,
    }
}

fn check_plausibility(record: &Record, _spec: Option<&'static PropertySpec>) -> Outcome {
    let (Some((a, b)), Some(unit)) = (record.si_range(), record.unit_si.as_deref()) else {
        return Outcome::Skip;
    };
    let Some(range) = plausible_range(&record.property, unit) else {
        return Outcome::Skip;
    };
    if range.contains(a.min(b), a.max(b)) {
        Outcome::Pass("range_plausible".into())
    } else {
        Outcome::Warn(format!(
            "out_of_plausible_range:[{:e}, {:e}] {}",
            range.min, range.max, range.si_unit
        ))
    }
}

fn check_temperature_context(record: &Record, spec: Option<&'static PropertySpec>) -> Outcome {
    match spec {
        Some(spec) if spec.temperature_sensitive => {
            if ontology::has_temperature_context(&record.provenance.snippet) {
                Outcome::Pass("temperature_context_present".into())
            } else {
                Outcome::Warn(MISSING_TEMPERATURE_CONTEXT.into())
            }
        }
        _ => Outcome::Skip,
    }
}

/// Run every per-record check.
pub fn check_record(record: &Record) -> ConstraintReport {
    let spec = ontology::property(&record.property);
    let mut report = ConstraintReport::new();
    for (_, check) in CHECKS {
        match check(record, spec) {
            Outcome::Pass(name) => report.pass(name),
            Outcome::Fail(name) => report.fail(name),
            Outcome::Warn(name) => report.warn(name),
            Outcome::Skip => {}
        }
    }
    report
}

/// Names of the per-record checks, in execution order.
pub fn check_names() -> impl Iterator<Item = &'static str> {
    CHECKS.iter().map(|(name, _)| *name)
}

/// Check every record of a document and attach the reports.
///
/// Returns the number of records that gained a hard failure.
pub fn check_all(records: &mut [Record]) -> usize {
    let mut reports: Vec<ConstraintReport> = records.iter().map(check_record).collect();
    for (i, outcome) in cross_record_warnings(records) {
        match outcome {
            Outcome::Pass(name) => reports[i].pass(name),
            Outcome::Warn(name) => reports[i].warn(name),
            Outcome::Fail(name) => reports[i].fail(name),
            Outcome::Skip => {}
        }
    }
    let mut blocked = 0;
    for (record, report) in records.iter_mut().zip(reports) {
        if report.is_blocking() {
            blocked += 1;
        }
        record.assign_constraints(report);
    }
    blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Provenance, SourceKind};
    use crate::units::normalize_record;

    fn record(property: &str, snippet: &str, min: f64, max: f64, unit: &str) -> Record {
        let spec = ontology::property(property);
        let mut r = Record::new(
            "PEO",
            property,
            spec.map(|s| s.category).unwrap_or("Other"),
            Provenance::new(1, snippet),
            SourceKind::Text,
        )
        .with_values(min, max)
        .with_unit(unit);
        normalize_record(&mut r);
        r
    }

    #[test]
    fn consistent_record_passes() {
        let r = record("ionic_conductivity", "reached 1e-4 S/cm at 25 °C", 1e-4, 1e-4, "S/cm");
        let report = check_record(&r);
        assert!(report.hard_fail.is_empty());
        assert!(report.soft_warn.is_empty());
        assert!(report.hard_pass.contains("unit_dimension_consistent"));
        assert!(report.hard_pass.contains("range_plausible"));
    }

    #[test]
    fn dimension_mismatch_is_hard_fail() {
        let r = record("glass_transition_temperature", "Tg was 1.2 S/cm", 1.2, 1.2, "S/cm");
        let report = check_record(&r);
        assert!(report
            .hard_fail
            .contains("unit_dimension_mismatch:temperature!=conductivity"));
    }

    #[test]
    fn inverted_range_is_hard_fail() {
        let r = record("ionic_conductivity", "from 9e-5 to 3e-5 S/cm at 25 °C", 9e-5, 3e-5, "S/cm");
        let report = check_record(&r);
        assert!(report.hard_fail.contains(INVERTED_RANGE));
    }

    #[test]
    fn inverted_range_without_si_is_still_caught() {
        let r = record("storage_modulus", "350 to 120 arb. units at 25 °C", 350.0, 120.0, "arb. units");
        let report = check_record(&r);
        assert!(report.hard_fail.contains(INVERTED_RANGE));
    }

    #[test]
    fn out_of_range_is_soft_warn() {
        let r = record("ionic_conductivity", "reached 50 S/cm at 25 °C", 50.0, 50.0, "S/cm");
        let report = check_record(&r);
        assert!(report.hard_fail.is_empty());
        assert!(report
            .soft_warn
            .iter()
            .any(|w| w.starts_with("out_of_plausible_range")));
    }

    #[test]
    fn unsupported_unit_is_only_a_warning() {
        let r = record("storage_modulus", "was 350 arb. units at 25 °C", 350.0, 350.0, "arb. units");
        let report = check_record(&r);
        assert!(report.hard_fail.is_empty());
        assert!(report.soft_warn.contains("unit_not_normalized:arb. units"));
    }

    #[test]
    fn temperature_sensitive_property_needs_context() {
        let r = record("ionic_conductivity", "reached 1e-4 S/cm", 1e-4, 1e-4, "S/cm");
        assert!(check_record(&r).soft_warn.contains(MISSING_TEMPERATURE_CONTEXT));
        let r = record("glass_transition_temperature", "Tg of -45 °C", -45.0, -45.0, "°C");
        assert!(!check_record(&r).soft_warn.contains(MISSING_TEMPERATURE_CONTEXT));
    }

    #[test]
    fn check_all_assigns_once_and_counts_blocked() {
        let mut records = vec![
            record("ionic_conductivity", "1e-4 S/cm at 25 °C", 1e-4, 1e-4, "S/cm"),
            record("ionic_conductivity", "9e-5 to 3e-5 S/cm at 25 °C", 9e-5, 3e-5, "S/cm"),
        ];
        assert_eq!(check_all(&mut records), 1);
        assert!(!records[0].is_blocked());
        assert!(records[1].is_blocked());
        let again = ConstraintReport::new();
        assert!(!records[0].assign_constraints(again));
    }

    #[test]
    fn check_table_order() {
        assert_eq!(
            check_names().collect::<Vec<_>>(),
            vec!["dimension", "range_order", "plausibility", "temperature_context"]
        );
    }
}
