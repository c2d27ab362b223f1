//! Section-header and report-furniture vocabulary.
//!
//! Report text is full of headings ("Executive Summary", "Reporting Period",
//! table-of-contents lines) that sit next to goal keywords. Candidates that
//! contain any of these phrases starting at a word boundary are rejected, so
//! "table" rejects "see Table 4" but not "accountable".

use regex::Regex;

/// Case-insensitive regex fragments, matched at the start of a word.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    r"chapter",
    r"section",
    r"figure",
    r"table",
    r"introduction",
    r"methodology",
    r"quantification",
    r"statement",
    r"executive\s*summary",
    r"climate\s*action",
    r"about\s*this\s*report",
    r"ghg\s*inventory\s*objectives",
    r"organisational\s*boundaries",
    r"operational\s*boundaries",
    r"boundaries",
    r"inventory\s*of\s*emissions",
    r"uncertainty\s*in\s*ghg\s*emissions\s*inventory",
    r"\bmini\b",
    r"contents",
    r"our\s*commitment\s*to\s*sustainability",
    r"consolidated\s*emissions\s*statement",
    r"reporting\s*period",
    r"key\s*highlights",
    r"performance\s*analysis",
    r"reduction\s*initiatives",
    r"conclusion",
    r"page\s*no\.",
    r"the\s*path\s*to\s*net\s*zero",
    r"our\s*strategy",
    r"committed\s*to\s*climate\s*action",
    r"aligning\s*with\s*the\s*un\s*sdgs",
    r"s\s*sdgs",
    r"journey\s*with\s*diligence\s*and\s*passion",
    r"promise\s*to\s*future\s*generations",
    r"climate\s*roadmap\s*aimed\s*at\s*reducing\s*our\s*greenhouse\s*gas",
    r"ambitious\s*but\s*achievable",
    r"benchmarks\s*for\s*rigorous\s*environmental\s*reporting",
    r"this\s*commitment\s*is\s*evident\s*in\s*our\s*comprehensive\s*ghg\s*emissions\s*inventory",
    r"featherlite\s*ghg\s*emissions\s*inventory\s*report\s*fy\d{2}\s*\d{2}\s*at\s*featherlite\s*our\s*guiding\s*principle",
];

/// Single predicate over the exclusion vocabulary.
#[derive(Debug, Clone)]
pub struct BoilerplateFilter {
    matcher: Regex,
}

impl BoilerplateFilter {
    pub fn new() -> Self {
        Self::with_vocabulary(DEFAULT_VOCABULARY)
    }

    pub fn with_vocabulary(vocabulary: &[&str]) -> Self {
        let alternation = vocabulary
            .iter()
            .map(|fragment| format!(r"\b(?:{})", fragment))
            .collect::<Vec<_>>()
            .join("|");
        // An empty vocabulary must reject nothing.
        let pattern = if alternation.is_empty() {
            r"[^\s\S]".to_string()
        } else {
            format!("(?i){}", alternation)
        };
        Self {
            matcher: Regex::new(&pattern).unwrap(),
        }
    }

    pub fn is_boilerplate(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

impl Default for BoilerplateFilter {
    fn default() -> Self {
        Self::new()
    }
}
