//! Self-attribution and citation cue tables

use regex::Regex;
use std::sync::LazyLock;

/// Which side of the decision a cue votes for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    SelfAttribution,
    Citation,
}

pub struct Cue {
    pub side: Side,
    pub pattern: Regex,
    pub weight: f64,
}

fn cue(side: Side, pattern: &str, weight: f64) -> Cue {
    Cue {
        side,
        pattern: Regex::new(pattern).expect("invalid origin cue pattern"),
        weight,
    }
}

pub static CUES: LazyLock<Vec<Cue>> = LazyLock::new(|| {
    use Side::*;
    vec![
        cue(SelfAttribution, r"(?i)\b(?:in\s+)?this\s+(?:work|study|paper)\b", 1.0),
        cue(SelfAttribution, r"(?i)\b(?:the\s+)?present\s+(?:work|study)\b", 1.0),
        cue(
            SelfAttribution,
            r"(?i)\bwe\s+(?:have\s+)?(?:measured|observed?|report(?:ed)?|obtained|found|synthesi[sz]ed|prepared|achieved|demonstrated?|determined|recorded|fabricated)\b",
            1.0,
        ),
        cue(SelfAttribution, r"(?i)\bherein\b", 0.8),
        cue(
            SelfAttribution,
            r"(?i)\bour\s+(?:samples?|results?|measurements?|electrolytes?|membranes?|films?|data|polymers?|system|findings)\b",
            0.8,
        ),
        cue(Citation, r"(?i)\brefs?\.\s*\d", 1.0),
        cue(
            Citation,
            r"(?i)\b(?:previously\s+reported|reported\s+previously|ha(?:s|ve)\s+been\s+reported|as\s+reported|(?:was|were)\s+reported\s+(?:by|in))\b",
            0.8,
        ),
        cue(Citation, r"(?i)\b(?:literature\s+values?|in\s+the\s+literature)\b", 0.8),
        cue(Citation, r"\bet\s+al\.", 0.6),
        cue(Citation, r"(?i)\baccording\s+to\b", 0.5),
        cue(Citation, r"(?i)\bpreviously\b", 0.5),
        cue(Citation, r"(?i)\b(?:similar\s+to|consistent\s+with|comparable\s+to)\b", 0.3),
    ]
});

/// Weight of an explicit citation marker ("[12]", "(Smith, 2020)")
pub const CITATION_MARKER_WEIGHT: f64 = 1.0;

/// Score at or above which a side counts as present
pub const PRESENCE_THRESHOLD: f64 = 0.5;

/// Sum of every weight a side can collect, marker included for citations.
pub fn total_weight(side: Side) -> f64 {
    let cues: f64 = CUES.iter().filter(|c| c.side == side).map(|c| c.weight).sum();
    match side {
        Side::SelfAttribution => cues,
        Side::Citation => cues + CITATION_MARKER_WEIGHT,
    }
}
