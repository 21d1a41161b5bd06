//! Typographic normalization of unit spellings
//!
//! PDF text layers spell the same unit many ways ("S cm⁻¹", "S·cm−1",
//! "Pa.s", "cps", "Ohm"). Rewrites are applied in table order on text whose
//! superscripts have already been folded to `^` notation.

use regex::Regex;
use std::sync::LazyLock;

struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

fn rewrite(pattern: &str, replacement: &'static str) -> Rewrite {
    Rewrite {
        pattern: Regex::new(pattern).expect("invalid unit rewrite pattern"),
        replacement,
    }
}

static REWRITES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    vec![
        rewrite(r"([GMkcmµnp]?S)\s*[·*]?\s*cm\s*\^?\s*-\s*1\b", "${1}/cm"),
        rewrite(r"([GMkcmµnp]?S)\s*[·*]?\s*m\s*\^?\s*-\s*1\b", "${1}/m"),
        rewrite(r"\bmol\s*[·*]?\s*L\s*\^?\s*-\s*1\b", "mol/L"),
        rewrite(r"\bmol\s*[·*]?\s*dm\s*\^?\s*-\s*3\b", "mol/L"),
        rewrite(r"\b(k?J|k?cal)\s*[·*]?\s*mol\s*\^?\s*-\s*1\b", "${1}/mol"),
        rewrite(r"\b(k?g)\s*[·*]?\s*mol\s*\^?\s*-\s*1\b", "${1}/mol"),
        rewrite(r"\brad\s*[·*]?\s*s\s*\^?\s*-\s*1\b", "rad/s"),
        rewrite(r"\b([mk]?Pa)\s*[·.*]?\s*s\b", "${1}·s"),
        rewrite(r"\b(s|min)\s*\^?\s*-\s*1\b", "${1}^-1"),
        rewrite(r"\b([kM]?)(?i:ohms?)\b", "${1}Ω"),
        rewrite(r"\b(?i:cps)\b", "cP"),
        rewrite(r"[°º˚]\s*C\b", "°C"),
        rewrite(r"\bum\b", "µm"),
    ]
});

const SUPERSCRIPTS: &[(char, char)] = &[
    ('⁰', '0'),
    ('¹', '1'),
    ('²', '2'),
    ('³', '3'),
    ('⁴', '4'),
    ('⁵', '5'),
    ('⁶', '6'),
    ('⁷', '7'),
    ('⁸', '8'),
    ('⁹', '9'),
    ('⁻', '-'),
    ('⁺', '+'),
];

fn superscript(c: char) -> Option<char> {
    SUPERSCRIPTS.iter().find(|(s, _)| *s == c).map(|(_, a)| *a)
}

/// Fold superscript runs to caret notation, the unicode minus to `-` and
/// the Greek mu to the micro sign. `"10⁻⁴"` becomes `"10^-4"`.
pub fn fold_typography(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_superscript = false;
    for c in text.chars() {
        match superscript(c) {
            Some(ascii) => {
                if !in_superscript {
                    out.push('^');
                    in_superscript = true;
                }
                out.push(ascii);
            }
            None => {
                in_superscript = false;
                match c {
                    '−' => out.push('-'),
                    'μ' => out.push('µ'),
                    _ => out.push(c),
                }
            }
        }
    }
    out
}

/// Rewrite unit spellings inside running text.
pub fn normalize_spellings(text: &str) -> String {
    let mut out = fold_typography(text);
    for rw in REWRITES.iter() {
        if rw.pattern.is_match(&out) {
            out = rw.pattern.replace_all(&out, rw.replacement).into_owned();
        }
    }
    out
}

/// Canonical spelling of a standalone unit token.
pub fn normalize_unit_str(unit: &str) -> String {
    let folded = normalize_spellings(unit.trim());
    if folded.contains(char::is_whitespace) && !folded.starts_with("arb") {
        // Whitespace inside a unit is layout noise once the rewrites ran
        folded.split_whitespace().collect()
    } else {
        folded
    }
}
