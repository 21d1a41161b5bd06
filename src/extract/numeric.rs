//! Numeric value and unit token scanning
//!
//! Operates on a matching copy of the text produced by
//! [`crate::units::normalize_spellings`], so exponents are already in caret
//! form (`1.2×10^-4`) and unit spellings are canonical.

use crate::units;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const NUM: &str = r"(?:10\^[+-]?\d+|[+-]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?(?:\s*[×x]\s*10\s*\^?\s*[+-]?\d+|[eE][+-]?\d+)?)";

const UNIT: &str = r"(?:(?i:arb\.?\s*units?)|a\.\s*u\.|(?i:arbitrary\s+units)|[A-Za-zµ°Ω%][A-Za-zµ°Ω%·/*^0-9-]*)";

static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?:^|[^\w.^])(?P<value>(?i:between)\s+(?P<a1>{n})\s+(?i:and)\s+(?P<b1>{n})|(?i:from)\s+(?P<a2>{n})\s+(?i:to)\s+(?P<b2>{n})|(?P<a3>{n})\s*(?:(?i:to)\s|[–—~-])\s*(?P<b3>{n})|(?P<v>{n})(?:\s*±\s*{n})?)(?:\s*(?P<unit>{u}))?",
        n = NUM,
        u = UNIT
    );
    Regex::new(&pattern).expect("invalid value pattern")
});

static TIMES_TEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<mantissa>[+-]?[\d.]+)\s*[×x]\s*10\s*\^?\s*(?P<exp>[+-]?\d+)$")
        .expect("invalid exponent pattern")
});

/// A numeric value (or range) with the unit token that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMatch {
    /// Byte offset of the value in the scanned text
    pub start: usize,
    pub end: usize,
    pub min: f64,
    pub max: f64,
    /// Recognized unit token, if any
    pub unit: Option<String>,
}

/// Parse one numeric token: plain, `e` notation, `×10^n`, `10^n`, or with
/// comma thousands separators.
pub fn parse_number(token: &str) -> Option<f64> {
    let cleaned: String = token.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if let Some(exp) = cleaned.strip_prefix("10^") {
        return format!("1e{}", exp.trim()).parse().ok();
    }
    if let Some(caps) = TIMES_TEN_RE.captures(cleaned) {
        // Re-parse as e notation so the result is correctly rounded
        return format!("{}e{}", &caps["mantissa"], &caps["exp"]).parse().ok();
    }
    cleaned.parse().ok()
}

/// Accept a unit token if it is recognized whole or up to its first hyphen
/// ("MPa-based" → "MPa").
fn recognize_unit(token: &str) -> Option<String> {
    let token = token.trim();
    if units::is_recognized(token) {
        return Some(token.to_string());
    }
    let head = token.split('-').next()?;
    if !head.is_empty() && head != token && units::is_recognized(head) {
        return Some(head.to_string());
    }
    None
}

fn bounds(caps: &Captures) -> Option<(f64, f64)> {
    for (a, b) in [("a1", "b1"), ("a2", "b2"), ("a3", "b3")] {
        if let (Some(min), Some(max)) = (caps.name(a), caps.name(b)) {
            return Some((parse_number(min.as_str())?, parse_number(max.as_str())?));
        }
    }
    let v = parse_number(caps.name("v")?.as_str())?;
    Some((v, v))
}

/// Every value in `text`, in order. Values whose unit token is missing or
/// unrecognized have `unit == None`.
pub fn scan_values(text: &str) -> Vec<ValueMatch> {
    VALUE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let value = caps.name("value")?;
            let (min, max) = bounds(&caps)?;
            let unit = caps.name("unit").and_then(|u| recognize_unit(u.as_str()));
            let end = caps.get(0).map(|m| m.end()).unwrap_or(value.end());
            Some(ValueMatch {
                start: value.start(),
                end,
                min,
                max,
                unit,
            })
        })
        .collect()
}
