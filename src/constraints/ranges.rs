//! Physically plausible ranges, in canonical units

pub struct PlausibleRange {
    pub property: &'static str,
    pub si_unit: &'static str,
    pub min: f64,
    pub max: f64,
}

const fn range(property: &'static str, si_unit: &'static str, min: f64, max: f64) -> PlausibleRange {
    PlausibleRange {
        property,
        si_unit,
        min,
        max,
    }
}

pub const PLAUSIBLE_RANGES: &[PlausibleRange] = &[
    // Solid polymer electrolytes: 1e-10 to 1 S/cm
    range("ionic_conductivity", "S/m", 1e-8, 100.0),
    range("li_transference_number", "1", 0.0, 1.0),
    range("electrochemical_stability_window", "V", 0.0, 10.0),
    range("activation_energy", "J", 1.6e-21, 4.8e-19),
    range("activation_energy", "J/mol", 1e3, 3e5),
    range("interfacial_resistance", "Ω", 1e-3, 1e7),
    range("concentration", "mol/L", 1e-6, 20.0),
    range("glass_transition_temperature", "K", 73.0, 773.0),
    range("melting_temperature", "K", 173.0, 873.0),
    range("number_average_molecular_weight", "g/mol", 100.0, 1e8),
    range("weight_average_molecular_weight", "g/mol", 100.0, 1e8),
    range("dispersity", "1", 1.0, 50.0),
    range("youngs_modulus", "Pa", 1e3, 1e12),
    range("tensile_strength", "Pa", 1e3, 1e10),
    range("storage_modulus", "Pa", 1e-3, 1e12),
    range("loss_modulus", "Pa", 1e-3, 1e12),
    range("complex_modulus", "Pa", 1e-3, 1e12),
    range("viscosity", "Pa·s", 1e-5, 1e9),
    range("complex_viscosity", "Pa·s", 1e-5, 1e9),
    range("zero_shear_viscosity", "Pa·s", 1e-5, 1e9),
    range("shear_rate", "s^-1", 1e-6, 1e6),
    range("strain_rate", "s^-1", 1e-6, 1e6),
    range("frequency", "Hz", 1e-6, 1e12),
    range("frequency", "rad/s", 1e-6, 1e12),
    range("stress", "Pa", 0.0, 1e11),
    range("strain", "1", 0.0, 100.0),
];

pub fn plausible_range(property: &str, si_unit: &str) -> Option<&'static PlausibleRange> {
    PLAUSIBLE_RANGES
        .iter()
        .find(|r| r.property == property && r.si_unit == si_unit)
}

impl PlausibleRange {
    pub fn contains(&self, lo: f64, hi: f64) -> bool {
        lo >= self.min && hi <= self.max
    }
}
