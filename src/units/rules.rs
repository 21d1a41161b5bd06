//! Unit and prefix tables

/// Conversion rule for one canonical unit spelling.
///
/// `si = (value + offset) * factor`
pub struct UnitRule {
    pub unit: &'static str,
    pub dimension: &'static str,
    pub si_unit: &'static str,
    pub factor: f64,
    pub offset: f64,
    /// May be combined with an SI prefix ("mS/cm", "MPa", "kDa")
    pub prefixable: bool,
}

const fn rule(
    unit: &'static str,
    dimension: &'static str,
    si_unit: &'static str,
    factor: f64,
    prefixable: bool,
) -> UnitRule {
    UnitRule {
        unit,
        dimension,
        si_unit,
        factor,
        offset: 0.0,
        prefixable,
    }
}

pub const UNIT_TABLE: &[UnitRule] = &[
    // Temperature
    rule("K", "temperature", "K", 1.0, false),
    UnitRule {
        unit: "°C",
        dimension: "temperature",
        si_unit: "K",
        factor: 1.0,
        offset: 273.15,
        prefixable: false,
    },
    // Pressure, moduli, stress
    rule("Pa", "pressure", "Pa", 1.0, true),
    rule("bar", "pressure", "Pa", 1e5, false),
    // Viscosity
    rule("Pa·s", "viscosity", "Pa·s", 1.0, true),
    rule("cP", "viscosity", "Pa·s", 1e-3, false),
    // Conductivity
    rule("S/m", "conductivity", "S/m", 1.0, true),
    rule("S/cm", "conductivity", "S/m", 100.0, true),
    // Frequency
    rule("Hz", "frequency", "Hz", 1.0, true),
    rule("rad/s", "angular_frequency", "rad/s", 1.0, false),
    // Electrical
    rule("V", "voltage", "V", 1.0, true),
    rule("Ω", "resistance", "Ω", 1.0, true),
    // Energy
    rule("J", "energy", "J", 1.0, true),
    rule("eV", "energy", "J", 1.602176634e-19, true),
    rule("J/mol", "molar_energy", "J/mol", 1.0, true),
    rule("kcal/mol", "molar_energy", "J/mol", 4184.0, false),
    // Molecular weight (reported in g/mol by convention)
    rule("g/mol", "molecular_weight", "g/mol", 1.0, true),
    rule("Da", "molecular_weight", "g/mol", 1.0, true),
    // Time and rate
    rule("s", "time", "s", 1.0, true),
    rule("min", "time", "s", 60.0, false),
    rule("h", "time", "s", 3600.0, false),
    rule("s^-1", "rate", "s^-1", 1.0, false),
    rule("min^-1", "rate", "s^-1", 1.0 / 60.0, false),
    // Concentration
    rule("M", "concentration", "mol/L", 1.0, true),
    rule("mol/L", "concentration", "mol/L", 1.0, true),
    // Length
    rule("m", "length", "m", 1.0, true),
    // Process
    rule("rpm", "rotation_rate", "rpm", 1.0, false),
    rule("W", "power", "W", 1.0, true),
    // Dimensionless
    rule("1", "dimensionless", "1", 1.0, false),
    rule("%", "dimensionless", "1", 0.01, false),
];

/// SI prefixes tried on the first component of an unknown unit
pub const PREFIXES: &[(&str, f64)] = &[
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("c", 1e-2),
    ("m", 1e-3),
    ("µ", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
];

/// Units recognized as real measurement units that have no SI mapping.
pub const NON_CONVERTIBLE: &[&str] = &["arb. units", "arb. unit", "arb units", "a.u.", "arbitrary units"];

pub fn find_rule(unit: &str) -> Option<&'static UnitRule> {
    UNIT_TABLE.iter().find(|r| r.unit == unit)
}

pub fn find_prefix(symbol: &str) -> Option<f64> {
    PREFIXES.iter().find(|(p, _)| *p == symbol).map(|(_, f)| *f)
}
