//! Unit normalization to metric tons of CO₂-equivalent.
//!
//! Unknown units fall back to a factor of 1 (already tCO₂e). A value that
//! fails to parse normalizes to 0, which extractors treat as "no data".

use std::collections::HashMap;

/// Conversion factors from a cleaned unit token to tCO₂e.
#[derive(Debug, Clone)]
pub struct UnitTable {
    factors: HashMap<&'static str, f64>,
}

impl Default for UnitTable {
    fn default() -> Self {
        let factors = [
            ("kt", 1_000.0),
            ("kilotons", 1_000.0),
            ("kilotonnes", 1_000.0),
            ("ktco2e", 1_000.0),
            ("mt", 1_000_000.0),
            ("megatons", 1_000_000.0),
            ("megatonnes", 1_000_000.0),
            ("mtco2e", 1_000_000.0),
            ("tons", 1.0),
            ("tonnes", 1.0),
            ("tco2e", 1.0),
            ("tonsco2e", 1.0),
            ("tonnesco2e", 1.0),
            ("gco2e", 0.000_001),
            ("kgco2e", 0.001),
        ]
        .into_iter()
        .collect();
        Self { factors }
    }
}

impl UnitTable {
    /// Factor for a raw unit token. Lower-cases, maps the subscript `₂` to `2`
    /// and strips everything that is not ASCII alphanumeric before lookup.
    pub fn factor(&self, raw_unit: &str) -> f64 {
        let key = clean_unit(raw_unit);
        self.factors.get(key.as_str()).copied().unwrap_or(1.0)
    }

    /// Normalize a numeric literal with a unit token to tCO₂e, rounded to 2 decimals.
    pub fn normalize(&self, raw_value: &str, raw_unit: &str) -> f64 {
        match parse_number(raw_value) {
            Some(value) => round2(value * self.factor(raw_unit)),
            None => 0.0,
        }
    }
}

/// Parse a numeric literal, ignoring thousands separators.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clean_unit(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c == '₂' { '2' } else { c })
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_factors() {
        let units = UnitTable::default();
        assert_eq!(units.normalize("5", "kt"), 5000.0);
        assert_eq!(units.normalize("2", "Megatons"), 2_000_000.0);
        assert_eq!(units.normalize("1,250", "tCO₂e"), 1250.0);
        assert_eq!(units.normalize("3,400", "tonnes"), 3400.0);
        assert_eq!(units.normalize("2500", "kgCO2e"), 2.5);
        assert_eq!(units.normalize("1000000", "g co2e"), 1.0);
    }

    #[test]
    fn test_unknown_unit_defaults_to_one() {
        let units = UnitTable::default();
        assert_eq!(units.factor("furlongs"), 1.0);
        assert_eq!(units.factor(""), 1.0);
        assert_eq!(units.normalize("42.5", "in"), 42.5);
    }

    #[test]
    fn test_unparseable_value_is_zero() {
        let units = UnitTable::default();
        assert_eq!(units.normalize("n/a", "tco2e"), 0.0);
        assert_eq!(units.normalize("", "kt"), 0.0);
    }

    #[test]
    fn test_rounding() {
        let units = UnitTable::default();
        assert_eq!(units.normalize("1.23456", "tco2e"), 1.23);
        assert_eq!(units.normalize("1234", "kgco2e"), 1.23);
    }

    #[test]
    fn test_normalization_idempotent() {
        let units = UnitTable::default();
        for (value, unit) in [("1,250", "kt"), ("0.125", "mt"), ("98765.4321", "tons"), ("7", "kgco2e")] {
            let once = units.normalize(value, unit);
            let twice = units.normalize(&once.to_string(), "tco2e");
            assert_eq!(once, twice, "{} {}", value, unit);
        }
    }
}
