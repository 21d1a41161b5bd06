//! Table-cell rules
//!
//! A column header names the property (and usually the unit, as
//! `Name (unit)`); each row is read like a sentence whose snippet is the
//! caption followed by the row's cells.

use super::citations::detect_citations;
use super::numeric::scan_values;
use super::{ExtractContext, TABLE_CONFIDENCE};
use crate::model::{Provenance, Record, SourceKind};
use crate::ontology::{self, PropertySpec};
use crate::source::TableRegion;
use crate::units::{self, normalize_spellings, normalize_unit_str};
use regex::Regex;
use std::sync::LazyLock;

static HEADER_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*?)\s*[(\[]\s*(?P<unit>[^()\[\]]+?)\s*[)\]]\s*$")
        .expect("invalid header pattern")
});

/// Unit assumed for unit-less cells under a dimensionless property
const DIMENSIONLESS_UNIT: &str = "1";

struct Column {
    property: Option<&'static PropertySpec>,
    unit: Option<String>,
}

fn parse_header(cell: &str) -> Column {
    let folded = units::fold_typography(cell);
    let (name, unit) = match HEADER_UNIT_RE.captures(&folded) {
        Some(caps) => {
            let unit = normalize_unit_str(&caps["unit"]);
            let unit = units::is_recognized(&unit).then_some(unit);
            (caps["name"].to_string(), unit)
        }
        None => (folded.clone(), None),
    };
    Column {
        property: ontology::infer_property(&name).or_else(|| ontology::infer_property(&folded)),
        unit,
    }
}

/// Records from one table region. Tables without a body yield nothing.
pub fn extract_from_table(table: &TableRegion, ctx: &ExtractContext) -> Vec<Record> {
    if !table.has_body() {
        return Vec::new();
    }

    // Without a detected header the first row is the header
    let (header, rows): (&[String], &[Vec<String>]) = if table.header.is_empty() {
        match table.rows.split_first() {
            Some((first, rest)) => (first.as_slice(), rest),
            None => return Vec::new(),
        }
    } else {
        (table.header.as_slice(), table.rows.as_slice())
    };
    let columns: Vec<Column> = header.iter().map(|h| parse_header(h)).collect();
    let caption_material = ontology::find_material(&table.caption);

    let mut records = Vec::new();
    for row in rows {
        let row_text = row
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        if row_text.is_empty() {
            continue;
        }
        let snippet = if table.caption.trim().is_empty() {
            row_text.clone()
        } else {
            format!("{} | {}", table.caption.trim(), row_text)
        };
        let citations = detect_citations(&snippet);
        let material = ontology::find_material(&row_text)
            .or(caption_material)
            .map(str::to_string)
            .unwrap_or_else(|| ctx.default_material.clone());
        let technique = ontology::find_technique(&snippet).map(str::to_string);

        for (cell, column) in row.iter().zip(&columns) {
            let Some(spec) = column.property else {
                continue;
            };
            let matching = normalize_spellings(cell);
            let Some(value) = scan_values(&matching).into_iter().next() else {
                continue;
            };
            let (unit, from_header) = match (&value.unit, &column.unit) {
                (Some(u), _) => (u.clone(), false),
                (None, Some(u)) => (u.clone(), true),
                (None, None) if spec.is_dimensionless() => (DIMENSIONLESS_UNIT.to_string(), true),
                (None, None) => continue,
            };

            let mut record = Record::new(
                material.clone(),
                spec.name,
                spec.category,
                Provenance::new(table.page, snippet.clone())
                    .with_bbox(table.bbox)
                    .with_table_id(table.table_id.clone()),
                SourceKind::Table,
            )
            .with_values(value.min, value.max)
            .with_unit(unit)
            .with_citations(citations.clone())
            .with_method("table-extracted")
            .with_technique(technique.clone())
            .with_confidence(TABLE_CONFIDENCE);
            if from_header {
                record.note_method("unit from column header");
            }
            if let Some(t) = &technique {
                record.note_method(&format!("technique: {}", t));
            }
            records.push(record);
        }
    }

    records
}
