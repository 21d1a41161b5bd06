//! Citation marker detection

use regex::Regex;
use std::sync::LazyLock;

static CITATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // [12], [3, 5], [3–5]
        r"\[\s*\d+(?:\s*[-–,]\s*\d+)*\s*\]",
        // (Smith et al., 2020), (Smith 2020)
        r"\(\s*[A-Z][A-Za-z-]+(?:\s+et\s+al\.)?,?\s*\d{4}[a-z]?\s*\)",
        // Ref. 3, Refs. 4-6
        r"(?i)\brefs?\.?\s*\d+(?:\s*[-–,]\s*\d+)*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid citation pattern"))
    .collect()
});

// (12), (12,13)
static NUMBERED_PAREN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*\d+(?:\s*[-–,]\s*\d+)*\s*\)").expect("invalid citation pattern")
});

/// Words that make a following "(2)" a label rather than a reference
const LABEL_WORDS: &[&str] = &[
    "eq", "eqs", "equation", "equations", "fig", "figure", "table", "scheme", "sample",
    "samples", "entry", "electrolyte", "membrane", "film", "compound", "polymer",
];

/// A numbered parenthesis is a reference only where a clause ends and the
/// word before it is not a label.
fn is_numbered_reference(text: &str, start: usize, end: usize) -> bool {
    let after = text[end..].trim_start();
    let closes_clause = after.is_empty() || after.starts_with(['.', ',', ';', ':', ')']);
    let before = text[..start]
        .trim_end()
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_end_matches('.')
        .to_lowercase();
    closes_clause && !LABEL_WORDS.contains(&before.as_str())
}

/// Citation tokens in `text`, in pattern order then position, without duplicates.
pub fn detect_citations(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut push = |token: &str| {
        let token = token.trim().to_string();
        if !found.contains(&token) {
            found.push(token);
        }
    };
    for (i, pattern) in CITATION_PATTERNS.iter().enumerate() {
        for m in pattern.find_iter(text) {
            push(m.as_str());
        }
        // numbered parentheses rank after brackets
        if i == 0 {
            for m in NUMBERED_PAREN.find_iter(text) {
                if is_numbered_reference(text, m.start(), m.end()) {
                    push(m.as_str());
                }
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_style() {
        assert_eq!(detect_citations("as reported [12]"), vec!["[12]"]);
        assert_eq!(detect_citations("prior work [3–5]."), vec!["[3–5]"]);
        assert_eq!(detect_citations("in Ref. 3 and Refs. 4-6"), vec!["Ref. 3", "Refs. 4-6"]);
        assert_eq!(
            detect_citations("(Smith et al., 2020) found"),
            vec!["(Smith et al., 2020)"]
        );
    }

    #[test]
    fn no_citation_in_plain_measurement() {
        assert!(detect_citations("We measured 1.2×10⁻⁴ S/cm at 25 °C.").is_empty());
    }

    #[test]
    fn numbered_parenthesis_at_clause_end_is_a_reference() {
        assert_eq!(
            detect_citations("Higher values were reported (12)."),
            vec!["(12)"]
        );
        assert_eq!(detect_citations("as shown before (3, 4), the"), vec!["(3, 4)"]);
    }

    #[test]
    fn numbered_labels_are_not_references() {
        assert!(detect_citations(
            "In this work, electrolyte (2) reached 1.2×10⁻⁴ S/cm at 25 °C."
        )
        .is_empty());
        assert!(detect_citations("The fit follows Eq. (3).").is_empty());
        assert!(detect_citations("Sample (4) was annealed.").is_empty());
    }

    #[test]
    fn duplicates_are_dropped() {
        assert_eq!(detect_citations("[2] and again [2]"), vec!["[2]"]);
    }
}
