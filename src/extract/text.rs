//! Text-span rules: sentence × property × value-with-unit

use super::citations::detect_citations;
use super::numeric::{scan_values, ValueMatch};
use super::sentences::split_sentences;
use super::{distinct_mentions, ExtractContext, TEXT_CONFIDENCE};
use crate::model::{Provenance, Record, SourceKind};
use crate::ontology::{self, PropertyMention, PropertySpec};
use crate::source::TextSpan;
use crate::units::{self, normalize_spellings};

/// Pick the property a value belongs to.
///
/// Candidates are the sentence's mentions whose dimensions accept the
/// value's unit (all mentions for units without a dimension). The nearest
/// preceding mention wins, else the nearest following one.
fn select_property(
    mentions: &[PropertyMention],
    value: &ValueMatch,
    dimension: Option<&str>,
) -> Option<&'static PropertySpec> {
    let accepts = |m: &&PropertyMention| dimension.map_or(true, |d| m.spec.accepts_dimension(d));
    let preceding = mentions
        .iter()
        .filter(accepts)
        .filter(|m| m.end <= value.start)
        .max_by_key(|m| m.end);
    let following = || {
        mentions
            .iter()
            .filter(accepts)
            .filter(|m| m.start >= value.end)
            .min_by_key(|m| m.start)
    };
    preceding.or_else(following).map(|m| m.spec)
}

/// True when the value is introduced by a condition word ("at 25 °C").
fn is_condition(matching: &str, value: &ValueMatch) -> bool {
    let head = matching[..value.start].trim_end();
    let last_word = head.rsplit(char::is_whitespace).next().unwrap_or("");
    matches!(last_word.to_lowercase().as_str(), "at" | "from" | "after" | "under")
}

/// Records from one text span.
pub fn extract_from_text(span: &TextSpan, ctx: &ExtractContext) -> Vec<Record> {
    let mut records = Vec::new();

    for sentence in split_sentences(&span.text) {
        if !sentence.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        let matching = normalize_spellings(sentence);
        let mentions = distinct_mentions(&matching);
        if mentions.is_empty() {
            continue;
        }
        let values: Vec<ValueMatch> = scan_values(&matching)
            .into_iter()
            .filter(|v| v.unit.is_some())
            .collect();
        if values.is_empty() {
            continue;
        }

        let citations = detect_citations(sentence);
        let material = ontology::find_material(sentence)
            .map(str::to_string)
            .unwrap_or_else(|| ctx.default_material.clone());
        let technique = ontology::find_technique(sentence).map(str::to_string);

        for value in &values {
            let Some(unit) = value.unit.as_deref() else {
                continue;
            };
            // Next to other values, "at 25 °C" is a measurement condition
            if values.len() > 1 && is_condition(&matching, value) {
                continue;
            }
            let dimension = units::dimension_of(unit);
            let spec = match select_property(&mentions, value, dimension.as_deref()) {
                Some(spec) => spec,
                // A lone value next to a lone, incompatible property is kept
                // so the dimensional check can flag it
                None if values.len() == 1 && mentions.len() == 1 && !is_condition(&matching, value) => {
                    mentions[0].spec
                }
                None => continue,
            };

            let mut record = Record::new(
                material.clone(),
                spec.name,
                spec.category,
                Provenance::new(span.page, sentence).with_bbox(span.bbox),
                SourceKind::Text,
            )
            .with_values(value.min, value.max)
            .with_unit(unit)
            .with_citations(citations.clone())
            .with_method("text-extracted")
            .with_technique(technique.clone())
            .with_confidence(TEXT_CONFIDENCE);
            if let Some(t) = &technique {
                record.note_method(&format!("technique: {}", t));
            }
            records.push(record);
        }
    }

    records
}
