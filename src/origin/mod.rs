//! Origin classification: this_work | literature | mixed | unclear
//!
//! A pure function of `(snippet, citations)`. Two cue sets are scored
//! independently and a fixed decision table maps the pair of scores to a
//! label. There is no state between calls.

mod cues;

pub use cues::{total_weight, Side, CITATION_MARKER_WEIGHT, PRESENCE_THRESHOLD};

use crate::model::{Origin, OriginAssessment, Record};
use cues::CUES;

#[derive(Default)]
struct Tally {
    score: f64,
    matched: Vec<String>,
}

impl Tally {
    fn add(&mut self, label: &str, weight: f64) {
        self.score += weight;
        self.matched.push(format!("{} ({:.1})", label, weight));
    }

    fn present(&self) -> bool {
        self.score >= PRESENCE_THRESHOLD
    }
}

/// Decision table over the two side scores.
fn decide(self_side: &Tally, citation_side: &Tally) -> Origin {
    let tie = self_side.score > 0.0 && self_side.score == citation_side.score;
    match (self_side.present(), citation_side.present()) {
        _ if tie => Origin::Mixed,
        (true, true) => Origin::Mixed,
        (true, false) => Origin::ThisWork,
        (false, true) => Origin::Literature,
        (false, false) => Origin::Unclear,
    }
}

/// Matched weight over the total weight of the sides the label draws on.
fn confidence(origin: Origin, self_score: f64, citation_score: f64) -> f64 {
    let self_total = total_weight(Side::SelfAttribution);
    let citation_total = total_weight(Side::Citation);
    let c = match origin {
        Origin::ThisWork => self_score / self_total,
        Origin::Literature => citation_score / citation_total,
        Origin::Mixed => (self_score + citation_score) / (self_total + citation_total),
        Origin::Unclear => 0.0,
    };
    c.clamp(0.0, 1.0)
}

/// Classify one claim from its snippet and detected citations.
pub fn classify(snippet: &str, citations: &[String]) -> OriginAssessment {
    let mut self_side = Tally::default();
    let mut citation_side = Tally::default();

    if !citations.is_empty() {
        citation_side.add(
            &format!("citation marker {}", citations.join(", ")),
            CITATION_MARKER_WEIGHT,
        );
    }

    for cue in CUES.iter() {
        if let Some(m) = cue.pattern.find(snippet) {
            let label = m.as_str().trim().to_lowercase();
            match cue.side {
                Side::SelfAttribution => self_side.add(&label, cue.weight),
                Side::Citation => citation_side.add(&label, cue.weight),
            }
        }
    }

    let origin = decide(&self_side, &citation_side);
    OriginAssessment {
        origin,
        confidence: confidence(origin, self_side.score, citation_side.score),
        self_score: self_side.score,
        citation_score: citation_side.score,
        self_cues: self_side.matched,
        citation_cues: citation_side.matched,
    }
}

/// Classify a record and set its origin. Returns false if it was already set.
pub fn classify_record(record: &mut Record) -> bool {
    let assessment = classify(&record.provenance.snippet, &record.citations);
    record.assign_origin(assessment)
}
