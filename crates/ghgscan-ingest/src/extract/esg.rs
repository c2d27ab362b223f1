//! ESG statement extraction.
//!
//! A statement is the text following a recognized label (for example
//! "Employee welfare:") up to the next period or newline.

use regex::Regex;

use super::{BoilerplateFilter, EsgRecord};

/// Minimum accepted snippet length, exclusive. Shorter captures are usually
/// a bare label or a table cell.
const MIN_SNIPPET_CHARS: usize = 20;

const ENVIRONMENTAL: &[&str] = &[
    r"environmental\s*performance",
    r"carbon\s*footprint",
    r"energy\s*consumption",
    r"water\s*usage",
    r"waste\s*management",
    r"climate\s*action",
];

const SOCIAL: &[&str] = &[
    r"social\s*responsibility",
    r"employee\s*welfare",
    r"community\s*engagement",
    r"diversity\s*and\s*inclusion",
    r"human\s*rights",
];

const GOVERNANCE: &[&str] = &[
    r"governance\s*structure",
    r"ethical\s*conduct",
    r"board\s*diversity",
    r"transparency\s*and\s*reporting",
];

pub struct EsgExtractor {
    environmental: Vec<Regex>,
    social: Vec<Regex>,
    governance: Vec<Regex>,
    boilerplate: BoilerplateFilter,
}

impl EsgExtractor {
    pub fn new(boilerplate: BoilerplateFilter) -> Self {
        Self {
            environmental: compile_labels(ENVIRONMENTAL),
            social: compile_labels(SOCIAL),
            governance: compile_labels(GOVERNANCE),
            boilerplate,
        }
    }

    /// Categories are independent; a sentence may land in more than one.
    pub fn extract(&self, text: &str) -> EsgRecord {
        EsgRecord {
            environmental: self.collect(&self.environmental, text),
            social: self.collect(&self.social, text),
            governance: self.collect(&self.governance, text),
        }
    }

    fn collect(&self, patterns: &[Regex], text: &str) -> Vec<String> {
        let mut snippets: Vec<String> = Vec::new();
        for re in patterns {
            for caps in re.captures_iter(text) {
                let Some(m) = caps.get(1) else { continue };
                let snippet = m.as_str().trim();
                if snippet.chars().count() > MIN_SNIPPET_CHARS
                    && !self.boilerplate.is_boilerplate(snippet)
                    && !snippets.iter().any(|s| s == snippet)
                {
                    snippets.push(snippet.to_string());
                }
            }
        }
        snippets
    }
}

impl Default for EsgExtractor {
    fn default() -> Self {
        Self::new(BoilerplateFilter::new())
    }
}

fn compile_labels(labels: &[&str]) -> Vec<Regex> {
    labels
        .iter()
        .map(|label| Regex::new(&format!(r"(?i){}[:\s]*([^\n.]+)", label)).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> EsgRecord {
        EsgExtractor::default().extract(text)
    }

    #[test]
    fn test_labeled_statements() {
        let record = extract(
            "Energy consumption: 40% of plant power now comes from rooftop solar. \
             Human rights: suppliers sign our labour code of conduct annually. \
             Board diversity: three independent women directors were appointed.",
        );
        assert_eq!(record.environmental, vec!["40% of plant power now comes from rooftop solar"]);
        assert_eq!(record.social, vec!["suppliers sign our labour code of conduct annually"]);
        assert_eq!(record.governance, vec!["three independent women directors were appointed"]);
    }

    #[test]
    fn test_short_snippet_rejected() {
        let record = extract("Water usage: reduced. Ethical conduct: see policy.");
        assert!(record.environmental.is_empty());
        assert!(record.governance.is_empty());
    }

    #[test]
    fn test_duplicates_collapsed_per_category() {
        let record = extract(
            "Waste management: all hazardous waste goes to licensed recyclers. \
             Waste management: all hazardous waste goes to licensed recyclers.",
        );
        assert_eq!(record.environmental.len(), 1);
        assert!(record.social.is_empty());
    }

    #[test]
    fn test_boilerplate_snippet_rejected() {
        let record = extract("Community engagement: refer to the table in the annexure for details.");
        assert!(record.social.is_empty());
    }

    #[test]
    fn test_vocabulary_inside_words_kept() {
        let record = extract("Human rights: suppliers sign an accountable labour charter annually.");
        assert_eq!(record.social, vec!["suppliers sign an accountable labour charter annually"]);
    }

    #[test]
    fn test_min_length_holds() {
        let record = extract(
            "Carbon footprint: 12 tCO2e. Diversity and inclusion: women make up 31% of our workforce today.",
        );
        for snippet in record.environmental.iter().chain(&record.social).chain(&record.governance) {
            assert!(snippet.chars().count() > MIN_SNIPPET_CHARS, "{}", snippet);
        }
        assert_eq!(record.social.len(), 1);
    }
}
