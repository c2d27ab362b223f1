//! Reporting entity and report year identification.
//!
//! Runs on the raw (original case) document text. Company and year are
//! resolved by independent scans and are not cross-checked against the
//! emissions figures.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CompanyInfo, UNKNOWN_COMPANY, UNKNOWN_YEAR};

/// Entities recognized by literal name. A hit short-circuits the name scan.
const KNOWN_ENTITIES: &[&str] = &["Featherlite"];

const COMPANY_PATTERNS: &[&str] = &[
    r"(?i)([A-Za-z\s&]+)\s*\b(?:Ltd|Limited|Inc|Corporation|Pvt|GmbH|Co)\b\.?",
    r"(?i)sustainability\s*report\s*(?:of|for)\s*([A-Za-z\s&]+)",
];

const YEAR_PATTERNS: &[&str] = &[
    r"(?i)\b(?:FY|financial year|fiscal year)[\s-]*(\d{2,4})\b",
    r"(?i)report\s*year[:\s]*(\d{4})",
    r"\b(20\d{2})\b",
];

static BOILERPLATE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)GHG Emissions Inventory Report|Sustainability Report").unwrap());

/// Extracts company name and report year.
pub struct CompanyExtractor {
    known_entities: Vec<(String, Regex)>,
    company_patterns: Vec<Regex>,
    year_patterns: Vec<Regex>,
}

impl CompanyExtractor {
    pub fn new() -> Self {
        Self::with_known_entities(KNOWN_ENTITIES)
    }

    /// Build with a custom list of literally-matched entity names.
    pub fn with_known_entities(names: &[&str]) -> Self {
        let known_entities = names
            .iter()
            .map(|name| {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name))).unwrap();
                (name.to_string(), re)
            })
            .collect();

        Self {
            known_entities,
            company_patterns: COMPANY_PATTERNS.iter().map(|p| Regex::new(p).unwrap()).collect(),
            year_patterns: YEAR_PATTERNS.iter().map(|p| Regex::new(p).unwrap()).collect(),
        }
    }

    pub fn extract(&self, text: &str) -> CompanyInfo {
        CompanyInfo {
            company_name: self
                .company_name(text)
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            report_year: self
                .report_year(text)
                .unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
        }
    }

    /// Resolve the company name: a known entity wins outright, otherwise the
    /// longest candidate across all matches of all patterns.
    pub fn company_name(&self, text: &str) -> Option<String> {
        if let Some((name, _)) = self.known_entities.iter().find(|(_, re)| re.is_match(text)) {
            return Some(name.clone());
        }

        let candidates = self.company_patterns.iter().flat_map(|re| {
            re.captures_iter(text)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| m.as_str())
        });

        longest_candidate(candidates)
    }

    /// Resolve the report year from the first pattern that matches anywhere.
    pub fn report_year(&self, text: &str) -> Option<String> {
        let captured = first_year(&self.year_patterns, text)?;
        Some(format_report_year(captured))
    }
}

impl Default for CompanyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Tie-break: keep the longest raw candidate; the kept value is stripped of
/// report-title boilerplate and trimmed. Ties keep the earlier candidate.
///
/// Longer is not more correct; an unrelated long phrase can win.
pub fn longest_candidate<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut best: Option<&str> = None;
    for candidate in candidates {
        if best.map_or(true, |b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }

    best.map(|raw| BOILERPLATE_SUFFIX.replace_all(raw, "").trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Tie-break: first match of the first pattern that matches, not the longest.
pub fn first_year<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns.iter().find_map(|re| {
        let caps = re.captures(text)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
    })
}

/// Format a captured year as `FY<year>`: two digits are read as 20xx and a
/// leading `FY` token is dropped.
pub fn format_report_year(captured: &str) -> String {
    let mut year = captured.trim();
    if year.get(..2).map_or(false, |p| p.eq_ignore_ascii_case("fy")) {
        year = year[2..].trim_start_matches(|c: char| c == ' ' || c == '-');
    }
    if year.len() == 2 {
        format!("FY20{}", year)
    } else {
        format!("FY{}", year)
    }
}
