//! Checks that relate records of the same material

use super::Outcome;
use crate::model::Record;

pub const MW_LT_MN: &str = "mw_lt_mn_anomaly";
pub const DISPERSITY_LT_1: &str = "dispersity_lt_1_anomaly";

const MN: &str = "number_average_molecular_weight";
const MW: &str = "weight_average_molecular_weight";

fn with_si<'a>(records: &'a [Record], property: &str) -> Vec<(usize, &'a Record, (f64, f64))> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.property == property)
        .filter_map(|(i, r)| r.si_range().map(|range| (i, r, range)))
        .collect()
}

/// Cross-record outcomes as `(record index, outcome)` pairs.
///
/// - `Mw < Mn` for the same material warns on both records
/// - a dispersity below 1 warns on that record
pub fn cross_record_warnings(records: &[Record]) -> Vec<(usize, Outcome)> {
    let mut out = Vec::new();

    let mn = with_si(records, MN);
    let mw = with_si(records, MW);
    for &(i, mn_rec, (mn_lo, mn_hi)) in &mn {
        for &(j, mw_rec, (mw_lo, mw_hi)) in &mw {
            if mn_rec.material != mw_rec.material || mn_rec.unit_si != mw_rec.unit_si {
                continue;
            }
            if mw_lo.max(mw_hi) < mn_lo.min(mn_hi) {
                out.push((i, Outcome::Warn(MW_LT_MN.into())));
                out.push((j, Outcome::Warn(MW_LT_MN.into())));
            } else {
                out.push((i, Outcome::Pass("mw_ge_mn".into())));
                out.push((j, Outcome::Pass("mw_ge_mn".into())));
            }
        }
    }

    for (i, _, (lo, hi)) in with_si(records, "dispersity") {
        if lo.min(hi) < 1.0 {
            out.push((i, Outcome::Warn(DISPERSITY_LT_1.into())));
        } else {
            out.push((i, Outcome::Pass("dispersity_ge_1".into())));
        }
    }

    out
}
