//! Unit normalization: original unit → canonical SI unit
//!
//! Lookup is exact-first against the rule table, then by SI prefix
//! decomposition of the first unit component ("mS/cm" = m × S/cm).
//! Every successful lookup yields a [`NormalizationTrace`] that converts in
//! both directions.

mod rules;
mod spelling;

pub use rules::{UnitRule, NON_CONVERTIBLE, PREFIXES, UNIT_TABLE};
pub use spelling::{fold_typography, normalize_spellings, normalize_unit_str};

use crate::model::{NormalizationTrace, Record};

/// Method note for values whose unit has no conversion rule
pub const UNSUPPORTED_UNIT: &str = "unsupported_unit";

fn trace_for(from: &str, rule: &UnitRule, prefix: f64) -> NormalizationTrace {
    NormalizationTrace {
        from: from.to_string(),
        to: rule.si_unit.to_string(),
        dimension: rule.dimension.to_string(),
        factor: prefix * rule.factor,
        offset: rule.offset,
    }
}

/// Resolve a unit to its conversion, if one exists.
pub fn lookup(unit: &str) -> Option<NormalizationTrace> {
    let canonical = normalize_unit_str(unit);
    if canonical.is_empty() {
        return None;
    }
    if let Some(rule) = rules::find_rule(&canonical) {
        return Some(trace_for(unit, rule, 1.0));
    }

    // Prefix decomposition: the first character is a prefix, the remainder
    // must be a prefixable rule ("kPa·s", "µS/cm", "kDa")
    let mut chars = canonical.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    let prefix = rules::find_prefix(first.encode_utf8(&mut [0u8; 4]))?;
    let rule = rules::find_rule(rest).filter(|r| r.prefixable)?;
    Some(trace_for(unit, rule, prefix))
}

/// Dimension class of a unit, when convertible.
pub fn dimension_of(unit: &str) -> Option<String> {
    lookup(unit).map(|t| t.dimension)
}

/// True for units with a conversion rule or a known non-convertible spelling.
pub fn is_recognized(unit: &str) -> bool {
    lookup(unit).is_some() || is_non_convertible(unit)
}

pub fn is_non_convertible(unit: &str) -> bool {
    let lowered = unit.trim().to_lowercase();
    NON_CONVERTIBLE.iter().any(|u| *u == lowered)
}

/// Original value → SI.
///
/// For offset units (°C) the SI value carries the offset, so a round
/// trip holds to 1e-9 of `max(|value|, offset)` rather than of `|value|`.
pub fn to_si(value: f64, trace: &NormalizationTrace) -> f64 {
    (value + trace.offset) * trace.factor
}

/// SI value → original unit.
pub fn from_si(value: f64, trace: &NormalizationTrace) -> f64 {
    value / trace.factor - trace.offset
}

/// Convert a bare value, returning `(si_value, si_unit)`.
pub fn convert(value: f64, unit: &str) -> Option<(f64, String)> {
    let trace = lookup(unit)?;
    Some((to_si(value, &trace), trace.to))
}

/// Attach SI values to a record, or note that its unit is unsupported.
///
/// A missing unit rule is a recorded limitation, never an error.
pub fn normalize_record(record: &mut Record) {
    match lookup(&record.unit_original) {
        Some(trace) => {
            let min = record.value_min.map(|v| to_si(v, &trace));
            let max = record.value_max.map(|v| to_si(v, &trace));
            let note = format!(
                "unit {} -> {} (x{}{})",
                trace.from,
                trace.to,
                trace.factor,
                if trace.offset != 0.0 {
                    format!(", offset {}", trace.offset)
                } else {
                    String::new()
                }
            );
            record.apply_si(min, max, trace);
            record.note_method(&note);
        }
        None => {
            record.note_method(UNSUPPORTED_UNIT);
        }
    }
}
