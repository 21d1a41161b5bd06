//! Sentence segmentation for provenance snippets

/// Tokens that end in a period without ending a sentence
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "al", "Ref", "Refs", "ref", "refs", "Fig", "Figs", "fig", "Eq", "Eqs", "eq",
    "vs", "ca", "approx", "No", "cf", "resp", "Tab",
];

fn word_before(text: &str, end: usize) -> &str {
    let head = &text[..end];
    let start = head
        .rfind(|c: char| c.is_whitespace() || c == '(' || c == '[')
        .map(|i| i + head[i..].chars().next().map(char::len_utf8).unwrap_or(1))
        .unwrap_or(0);
    &head[start..]
}

/// Split `text` into trimmed sentences.
///
/// A boundary is `.`, `!` or `?` followed by whitespace and an uppercase
/// letter, unless the period closes a known abbreviation. Semicolons do not
/// split, so clauses joined by them stay in one snippet.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let after = i + c.len_utf8();
        let rest = &text[after..];
        let trimmed = rest.trim_start();
        if trimmed.len() == rest.len() {
            continue;
        }
        let next_upper = trimmed
            .chars()
            .next()
            .map(char::is_uppercase)
            .unwrap_or(false);
        if !next_upper {
            continue;
        }
        if c == '.' && ABBREVIATIONS.contains(&word_before(text, i)) {
            continue;
        }
        let sentence = text[start..after].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = after;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let s = split_sentences("PEO was cast. We measured 1e-4 S/cm! Is it stable? Yes.");
        assert_eq!(
            s,
            vec!["PEO was cast.", "We measured 1e-4 S/cm!", "Is it stable?", "Yes."]
        );
    }

    #[test]
    fn keeps_abbreviations_and_decimals() {
        let s = split_sentences(
            "As shown in Fig. 2 and by Smith et al. The value 1.2 S/cm was reported in Ref. 3.",
        );
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn semicolons_do_not_split() {
        let s = split_sentences("We measured 1.5 S/cm; Ref. 3 reported 0.9 S/cm.");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn lowercase_continuation_does_not_split() {
        let s = split_sentences("reached 350 arb. units at 25 °C. Next sentence.");
        assert_eq!(s, vec!["reached 350 arb. units at 25 °C.", "Next sentence."]);
    }
}
