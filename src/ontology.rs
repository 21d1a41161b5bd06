//! Domain rule tables: properties, materials, techniques
//!
//! Polymer rheology and battery electrolytes. Each table is ordered data;
//! adding a property or material means adding a row, not a branch.

use regex::Regex;
use std::sync::LazyLock;

/// Canonical property with the unit dimensions it may be reported in.
pub struct PropertySpec {
    pub name: &'static str,
    pub category: &'static str,
    /// Accepted dimension classes (first entry is the expected one)
    pub dimensions: &'static [&'static str],
    /// Reported values depend on measurement temperature
    pub temperature_sensitive: bool,
    patterns: Vec<Regex>,
}

impl PropertySpec {
    pub fn expected_dimension(&self) -> &'static str {
        self.dimensions[0]
    }

    pub fn accepts_dimension(&self, dimension: &str) -> bool {
        self.dimensions.contains(&dimension)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.expected_dimension() == "dimensionless"
    }
}

/// A property mention located in a piece of text.
#[derive(Clone, Copy)]
pub struct PropertyMention {
    pub spec: &'static PropertySpec,
    pub start: usize,
    pub end: usize,
}

impl PropertyMention {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

struct PropertyRow {
    name: &'static str,
    category: &'static str,
    dimensions: &'static [&'static str],
    temperature_sensitive: bool,
    patterns: &'static [&'static str],
}

const PROPERTY_TABLE: &[PropertyRow] = &[
    PropertyRow {
        name: "ionic_conductivity",
        category: "Electrochemical",
        dimensions: &["conductivity"],
        temperature_sensitive: true,
        patterns: &[r"(?i)\bionic\s+conductivit(?:y|ies)\b", r"(?i)\bconductivit(?:y|ies)\b", r"σ"],
    },
    PropertyRow {
        name: "li_transference_number",
        category: "Electrochemical",
        dimensions: &["dimensionless"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\btransference\s+numbers?\b", r"\bt_?Li\+?", r"\bt\+"],
    },
    PropertyRow {
        name: "electrochemical_stability_window",
        category: "Electrochemical",
        dimensions: &["voltage"],
        temperature_sensitive: false,
        patterns: &[
            r"(?i)\b(?:electrochemical\s+)?stability\s+window\b",
            r"(?i)\belectrochemical\s+stability\b",
            r"\bESW\b",
        ],
    },
    PropertyRow {
        name: "activation_energy",
        category: "Electrochemical",
        dimensions: &["energy", "molar_energy"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bactivation\s+energ(?:y|ies)\b", r"\bE_?a\b"],
    },
    PropertyRow {
        name: "interfacial_resistance",
        category: "Electrochemical",
        dimensions: &["resistance"],
        temperature_sensitive: true,
        patterns: &[
            r"(?i)\binterfacial\s+resistance\b",
            r"(?i)\bcharge[\s-]transfer\s+resistance\b",
            r"\bR_?ct\b",
        ],
    },
    PropertyRow {
        name: "concentration",
        category: "Chemical",
        dimensions: &["concentration"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bconcentrations?\b", r"(?i)\bmolarity\b"],
    },
    PropertyRow {
        name: "glass_transition_temperature",
        category: "Thermal",
        dimensions: &["temperature"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bglass[\s-]transition(?:\s+temperature)?\b", r"\bT_?g\b"],
    },
    PropertyRow {
        name: "melting_temperature",
        category: "Thermal",
        dimensions: &["temperature"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bmelting\s+(?:temperature|point)\b", r"\bT_?m\b"],
    },
    PropertyRow {
        name: "number_average_molecular_weight",
        category: "Chemical",
        dimensions: &["molecular_weight"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bnumber[\s-]average\s+molecular\s+weight\b", r"\bM_?n\b"],
    },
    PropertyRow {
        name: "weight_average_molecular_weight",
        category: "Chemical",
        dimensions: &["molecular_weight"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bweight[\s-]average\s+molecular\s+weight\b", r"\bM_?w\b"],
    },
    PropertyRow {
        name: "dispersity",
        category: "Chemical",
        dimensions: &["dimensionless"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\b(?:poly)?dispersity\b", r"\bPDI\b", r"Đ"],
    },
    PropertyRow {
        name: "youngs_modulus",
        category: "Mechanical",
        dimensions: &["pressure"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\byoung(?:'|’)?s\s+modulus\b", r"(?i)\belastic\s+modulus\b"],
    },
    PropertyRow {
        name: "tensile_strength",
        category: "Mechanical",
        dimensions: &["pressure"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\btensile\s+strength\b"],
    },
    PropertyRow {
        name: "storage_modulus",
        category: "Rheology",
        dimensions: &["pressure"],
        temperature_sensitive: true,
        patterns: &[r"(?i)\bstorage\s+modulus\b", r"\bG['′](?:[^'′″]|$)"],
    },
    PropertyRow {
        name: "loss_modulus",
        category: "Rheology",
        dimensions: &["pressure"],
        temperature_sensitive: true,
        patterns: &[r"(?i)\bloss\s+modulus\b", r"\bG(?:''|″|′′)"],
    },
    PropertyRow {
        name: "complex_modulus",
        category: "Rheology",
        dimensions: &["pressure"],
        temperature_sensitive: true,
        patterns: &[r"(?i)\bcomplex\s+modulus\b", r"\bG\*"],
    },
    PropertyRow {
        name: "viscosity",
        category: "Rheology",
        dimensions: &["viscosity"],
        temperature_sensitive: true,
        patterns: &[r"(?i)\bviscosit(?:y|ies)\b", r"η"],
    },
    PropertyRow {
        name: "complex_viscosity",
        category: "Rheology",
        dimensions: &["viscosity"],
        temperature_sensitive: true,
        patterns: &[r"(?i)\bcomplex\s+viscosity\b", r"\|?η\*\|?"],
    },
    PropertyRow {
        name: "zero_shear_viscosity",
        category: "Rheology",
        dimensions: &["viscosity"],
        temperature_sensitive: true,
        patterns: &[r"(?i)\bzero[\s-]shear\s+viscosity\b", r"η_?0"],
    },
    PropertyRow {
        name: "shear_rate",
        category: "Rheology",
        dimensions: &["rate"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bshear\s+rates?\b"],
    },
    PropertyRow {
        name: "frequency",
        category: "Rheology",
        dimensions: &["frequency", "angular_frequency"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\b(?:angular\s+)?frequenc(?:y|ies)\b", r"ω"],
    },
    PropertyRow {
        name: "strain_rate",
        category: "Mechanical",
        dimensions: &["rate"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bstrain\s+rates?\b"],
    },
    PropertyRow {
        name: "stress",
        category: "Mechanical",
        dimensions: &["pressure"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bstress\b"],
    },
    PropertyRow {
        name: "strain",
        category: "Mechanical",
        dimensions: &["dimensionless"],
        temperature_sensitive: false,
        patterns: &[r"(?i)\bstrain\b", r"(?i)\belongation\s+at\s+break\b"],
    },
];

static PROPERTIES: LazyLock<Vec<PropertySpec>> = LazyLock::new(|| {
    PROPERTY_TABLE
        .iter()
        .map(|row| PropertySpec {
            name: row.name,
            category: row.category,
            dimensions: row.dimensions,
            temperature_sensitive: row.temperature_sensitive,
            patterns: row.patterns.iter().map(|p| compile(p)).collect(),
        })
        .collect()
});

const MATERIAL_LEXICON: &[&str] = &[
    "PVDF-HFP", "PEO", "PEG", "PVDF", "PAN", "PMMA", "PS", "PLA", "PCL", "PVA", "PAA", "PDMS",
    "PTFE", "PET", "LiTFSI", "LiPF6", "LiFSI", "LiClO4", "LiBF4", "LLZO", "LATP", "ZnO", "SiO2",
    "Al2O3", "TiO2",
];

static MATERIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut names: Vec<&str> = MATERIAL_LEXICON.to_vec();
    // Longest first so "PVDF-HFP" wins over "PVDF"
    names.sort_by_key(|n| std::cmp::Reverse(n.len()));
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    compile(&format!(r"\b(?:{})\b", alternation))
});

const TECHNIQUE_TABLE: &[(&str, &str)] = &[
    ("EIS", r"\bEIS\b|(?i)\belectrochemical\s+impedance\b"),
    ("DSC", r"\bDSC\b"),
    ("DMA", r"\bDMA\b"),
    ("TGA", r"\bTGA\b"),
    ("GPC", r"\bGPC\b"),
    ("SEC", r"\bSEC\b"),
    ("LSV", r"\bLSV\b"),
    ("CV", r"\bCV\b"),
    ("NMR", r"\bNMR\b"),
    ("FTIR", r"\bFT-?IR\b"),
    ("Raman", r"\bRaman\b"),
    ("XRD", r"\bXRD\b"),
    ("SEM", r"\bSEM\b"),
    ("TEM", r"\bTEM\b"),
    ("AFM", r"\bAFM\b"),
    ("rheometry", r"(?i)\brheomet(?:er|ry)\b|(?i)\boscillatory\s+shear\b"),
];

static TECHNIQUES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TECHNIQUE_TABLE
        .iter()
        .map(|(label, pattern)| (*label, compile(pattern)))
        .collect()
});

static TEMPERATURE_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"[-−]?\d+(?:\.\d+)?\s*(?:°|º|˚)\s*C\b|\b\d+(?:\.\d+)?\s*K\b|(?i)\broom\s+temperature\b|\bRT\b|(?i)\bambient\b",
    )
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid ontology pattern")
}

/// All property specs, in table order.
pub fn properties() -> &'static [PropertySpec] {
    &PROPERTIES
}

/// Look up a property by canonical name.
pub fn property(name: &str) -> Option<&'static PropertySpec> {
    PROPERTIES.iter().find(|p| p.name == name)
}

/// Every property mention in `text`, ordered by position then length (longest first).
pub fn property_mentions(text: &str) -> Vec<PropertyMention> {
    let mut mentions = Vec::new();
    for spec in PROPERTIES.iter() {
        for pattern in &spec.patterns {
            for m in pattern.find_iter(text) {
                mentions.push(PropertyMention {
                    spec,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
    }
    mentions.sort_by_key(|m| (m.start, std::cmp::Reverse(m.len())));
    mentions
}

/// The most specific (longest-matching) property named in `text`.
pub fn infer_property(text: &str) -> Option<&'static PropertySpec> {
    property_mentions(text)
        .into_iter()
        .max_by_key(|m| (m.len(), std::cmp::Reverse(m.start)))
        .map(|m| m.spec)
}

/// First material-lexicon hit in `text`.
pub fn find_material(text: &str) -> Option<&'static str> {
    let hit = MATERIAL_RE.find(text)?;
    MATERIAL_LEXICON.iter().copied().find(|m| *m == hit.as_str())
}

/// All material-lexicon hits in `text`, in order.
pub fn material_hits(text: &str) -> impl Iterator<Item = &str> {
    MATERIAL_RE.find_iter(text).map(|m| m.as_str())
}

/// First technique named in `text`, in table order.
pub fn find_technique(text: &str) -> Option<&'static str> {
    TECHNIQUES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(label, _)| *label)
}

/// Whether `text` states a measurement temperature.
pub fn has_temperature_context(text: &str) -> bool {
    TEMPERATURE_CONTEXT.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_row_compiles_and_names_are_unique() {
        let names: std::collections::HashSet<_> = properties().iter().map(|p| p.name).collect();
        assert_eq!(names.len(), PROPERTY_TABLE.len());
        assert!(properties().iter().all(|p| !p.dimensions.is_empty()));
    }

    #[test]
    fn longest_property_wins() {
        assert_eq!(infer_property("ionic conductivity").unwrap().name, "ionic_conductivity");
        assert_eq!(infer_property("the complex viscosity").unwrap().name, "complex_viscosity");
        assert_eq!(infer_property("strain rate").unwrap().name, "strain_rate");
        assert_eq!(infer_property("Tg (°C)").unwrap().name, "glass_transition_temperature");
    }

    #[test]
    fn storage_and_loss_moduli_are_distinct() {
        assert_eq!(infer_property("G' (Pa)").unwrap().name, "storage_modulus");
        assert_eq!(infer_property("G'' (Pa)").unwrap().name, "loss_modulus");
    }

    #[test]
    fn material_lexicon_prefers_longest_name() {
        assert_eq!(find_material("a PVDF-HFP membrane"), Some("PVDF-HFP"));
        assert_eq!(find_material("PEO with LiTFSI"), Some("PEO"));
        assert_eq!(find_material("PEOX copolymer"), None);
        assert_eq!(material_hits("PEO, LiTFSI and PEO").count(), 3);
    }

    #[test]
    fn technique_detection() {
        assert_eq!(find_technique("measured by EIS at 25 °C"), Some("EIS"));
        assert_eq!(find_technique("via electrochemical impedance spectroscopy"), Some("EIS"));
        assert_eq!(find_technique("DSC thermograms"), Some("DSC"));
        assert_eq!(find_technique("no technique here"), None);
    }

    #[test]
    fn temperature_context() {
        assert!(has_temperature_context("at 25°C"));
        assert!(has_temperature_context("at 298 K"));
        assert!(has_temperature_context("at room temperature"));
        assert!(!has_temperature_context("reached 1.2e-4 S/cm"));
    }

    #[test]
    fn dimension_acceptance() {
        let ea = property("activation_energy").unwrap();
        assert!(ea.accepts_dimension("energy"));
        assert!(ea.accepts_dimension("molar_energy"));
        assert!(!ea.accepts_dimension("temperature"));
        assert!(property("dispersity").unwrap().is_dimensionless());
    }
}
