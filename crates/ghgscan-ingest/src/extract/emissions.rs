//! Emissions-by-scope extraction.
//!
//! Operates on lower-cased, whitespace-collapsed text. Each scope has an
//! ordered cascade, specific phrasing first and generic phrasing last. Only
//! the first match of each pattern is considered; the first pattern whose
//! match normalizes to a strictly positive value wins.

use regex::Regex;
use tracing::debug;

use super::{EmissionsRecord, Scope, ScopeValue};
use crate::units::UnitTable;

/// Numeric literal with optional thousands separators and decimals.
const NUMBER: &str = r"(\d+(?:,\d+)*(?:\.\d+)?)";
/// One unit token, optionally followed by a detached `co2e`.
const UNIT: &str = r"(?:\s*([a-z₂][a-z0-9₂]*(?:\s*co[2₂]e)?))?";
/// Unit assumed when a figure has none.
const DEFAULT_UNIT: &str = "tco2e";

const SCOPE_1: &[&str] = &[
    r"scope\s*1\b\s*emissions?[:\s]*",
    r"\bdirect\s*emissions?[:\s]*",
    r"scope\s*1\b[:\s]*",
];

const SCOPE_2: &[&str] = &[
    r"scope\s*2\b\s*emissions?[:\s]*",
    r"\bindirect\s*emissions?[:\s]*",
    r"electricity\s*emissions?[:\s]*",
    r"scope\s*2\b[:\s]*",
];

const SCOPE_3: &[&str] = &[
    r"scope\s*3\b\s*emissions?[:\s]*",
    r"value\s*chain\s*emissions?[:\s]*",
    r"other\s*indirect\s*emissions?[:\s]*",
    r"scope\s*3\b[:\s]*",
];

const TOTAL: &[&str] = &[
    r"total\s*ghg\s*emissions?[:\s]*",
    r"total\s*emissions?[:\s]*",
    r"total\s*carbon\s*emissions?[:\s]*",
    r"scope\s*1\s*and\s*2\s*carbon\s*footprint(?:\s*for\s*the\s*reporting\s*year)?\s*is\s*",
];

/// Extracts Scope 1/2/3 and total emissions figures.
pub struct EmissionsExtractor {
    cascades: Vec<(Scope, Vec<Regex>)>,
    units: UnitTable,
}

impl EmissionsExtractor {
    pub fn new() -> Self {
        Self::with_units(UnitTable::default())
    }

    pub fn with_units(units: UnitTable) -> Self {
        let cascades = [
            (Scope::Scope1, SCOPE_1),
            (Scope::Scope2, SCOPE_2),
            (Scope::Scope3, SCOPE_3),
            (Scope::Total, TOTAL),
        ]
        .into_iter()
        .map(|(scope, prefixes)| {
            let patterns = prefixes
                .iter()
                .map(|prefix| Regex::new(&format!("{}{}{}", prefix, NUMBER, UNIT)).unwrap())
                .collect();
            (scope, patterns)
        })
        .collect();

        Self { cascades, units }
    }

    /// Extract all four scopes from normalized text. Scopes resolve independently.
    pub fn extract(&self, text: &str) -> EmissionsRecord {
        let mut record = EmissionsRecord::default();

        for (scope, patterns) in &self.cascades {
            let candidates = patterns
                .iter()
                .filter_map(|re| first_figure(re, text))
                .map(|(value, unit)| self.units.normalize(value, unit.unwrap_or(DEFAULT_UNIT)));

            let value = first_positive(candidates);
            debug!("Resolved {} = {}", scope, value);
            record.set(*scope, value);
        }

        record
    }
}

impl Default for EmissionsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// First match of a pattern: the numeric literal and its unit token, if any.
fn first_figure<'t>(re: &Regex, text: &'t str) -> Option<(&'t str, Option<&'t str>)> {
    let caps = re.captures(text)?;
    let value = caps.get(1)?.as_str();
    let unit = caps.get(2).map(|m| m.as_str());
    Some((value, unit))
}

/// Tie-break: the first strictly positive candidate wins. Zero and negative
/// values are noise, not data, and do not stop the cascade.
///
/// A truthfully reported zero therefore reads as "N/A".
pub fn first_positive(candidates: impl IntoIterator<Item = f64>) -> ScopeValue {
    candidates
        .into_iter()
        .find(|v| *v > 0.0)
        .map(ScopeValue::Reported)
        .unwrap_or(ScopeValue::NotAvailable)
}
