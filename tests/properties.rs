//! Whole-pipeline guarantees: determinism, purity, monotonicity, round trips

mod common;

use common::*;
use ironclad::origin::classify;
use ironclad::units;
use ironclad::{build_comparison, BaselineEntry};

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let first = run_with_baseline(electrolyte_paper(), electrolyte_baseline()).await;
    let second = run_with_baseline(electrolyte_paper(), electrolyte_baseline()).await;

    assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
    assert_eq!(first.records_csv().unwrap(), second.records_csv().unwrap());
    assert_eq!(first.comparison_csv().unwrap(), second.comparison_csv().unwrap());
}

#[test]
fn classifier_ignores_call_history() {
    let cases: Vec<(&str, Vec<String>)> = vec![
        ("In this work, we measured 1.2e-4 S/cm.", vec![]),
        ("Values of 3e-5 S/cm were reported previously [4].", vec!["[4]".into()]),
        ("We measured 210 K, while Ref. 3 reported 205 K.", vec!["Ref. 3".into()]),
        ("The modulus was 2 GPa.", vec![]),
    ];

    let forward: Vec<_> = cases.iter().map(|(s, c)| classify(s, c)).collect();
    let backward: Vec<_> = cases.iter().rev().map(|(s, c)| classify(s, c)).collect();
    let again: Vec<_> = cases.iter().map(|(s, c)| classify(s, c)).collect();

    assert_eq!(forward, again);
    for (a, b) in forward.iter().zip(backward.iter().rev()) {
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn record_order_does_not_change_origins() {
    let export = run(electrolyte_paper()).await;
    for r in &export.records {
        let alone = classify(&r.provenance.snippet, &r.citations);
        assert_eq!(Some(alone.origin), r.origin);
    }
}

#[tokio::test]
async fn baseline_only_touches_baseline_columns() {
    let export = run(electrolyte_paper()).await;
    let without = build_comparison(&export.records, &[]);

    let baselines = [
        electrolyte_baseline(),
        vec![BaselineEntry::new("PEO", "ionic_conductivity", 0.5, 2.0, "S/m")],
        vec![
            BaselineEntry::new("PEO", "glass_transition_temperature", 200.0, 220.0, "K"),
            BaselineEntry::new("PVDF", "ionic_conductivity", 1e-3, 1e-2, "S/m"),
        ],
    ];
    for baseline in baselines {
        let with = build_comparison(&export.records, &baseline);
        assert_eq!(with.len(), without.len());
        for (a, b) in without.iter().zip(&with) {
            assert_eq!((&a.material, &a.property), (&b.material, &b.property));
            assert_eq!(a.this_work, b.this_work);
            assert_eq!(a.paper_cited_literature, b.paper_cited_literature);
            assert_eq!(a.paper_citations, b.paper_citations);
        }
    }
}

#[test]
fn prefixed_units_round_trip() {
    for unit in ["mS/cm", "µS/cm", "kPa", "GPa", "MPa·s", "mPa·s", "kDa", "kg/mol", "kJ/mol", "ms"] {
        let trace = units::lookup(unit).unwrap_or_else(|| panic!("no rule for {}", unit));
        for value in [-40.0, 0.37, 25.0, 1.2e-4, 3.5e6] {
            let back = units::from_si(units::to_si(value, &trace), &trace);
            assert!(
                ((back - value) / value).abs() < 1e-9,
                "{} {} came back as {}",
                value,
                unit,
                back
            );
        }
    }
}

#[tokio::test]
async fn extracted_records_round_trip_to_original_units() {
    let export = run(electrolyte_paper()).await;
    for r in export.records.iter().filter(|r| r.has_si()) {
        let trace = r.normalization.as_ref().unwrap();
        let back = units::from_si(r.value_si_min.unwrap(), trace);
        assert_close(back, r.value_min.unwrap());
    }
}
