//! Sustainability goal statements.
//!
//! Candidates come from several phrase families, each capturing the goal's
//! object up to a sentence boundary. A boundary is a period not followed by
//! a word character, a newline, or the end of input.

use once_cell::sync::Lazy;
use regex::Regex;

use super::BoilerplateFilter;

/// Maximum number of goals kept per document.
pub const MAX_GOALS: usize = 5;

/// Minimum accepted goal length, exclusive.
const MIN_GOAL_CHARS: usize = 10;

/// Sentence boundary. The character after a period is consumed instead of
/// looked ahead at.
const END: &str = r"(?:\.(?:\W|$)|\n|$)";

/// Goal phrase families in priority order. Each has at most one capture
/// group; families without one contribute the whole match. Capture bodies
/// admit a period only when a word character follows it.
const GOAL_PATTERNS: &[&str] = &[
    r"\b(?:target|goal|objective|aim)\b\s*(?:to|of)?\s*(?:achieve|reduce|cut|decrease|increase)?\s*((?:[^.\n]|\.\w)+?)",
    r"\bcommit(?:ment)?\b[^.\n]*?\bto\b\s*((?:[^.\n]|\.\w)+?)",
    r"\bnet\s*zero\s*emissions\b",
    r"(\d+(?:\.\d+)?%\s*(?:reduction|increase)?\s*in\s+(?:[^.\n]|\.\w)+?)",
    r"\bpledge\s*to\s*((?:[^.\n]|\.\w)+?)",
    r"\b(?:plan|aims?)\s*to\s*(?:reduce|achieve|implement)\s*((?:[^.\n]|\.\w)+?)",
    r"\b(?:set\s*a\s*target|have\s*set\s*targets)\s*to\s*((?:[^.\n]|\.\w)+?)",
];

static BY_PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*by\s*\d+%?").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\s+").unwrap());
static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").unwrap());

/// Extracts up to [`MAX_GOALS`] distinct goal statements.
pub struct GoalExtractor {
    patterns: Vec<Regex>,
    boilerplate: BoilerplateFilter,
}

impl GoalExtractor {
    pub fn new(boilerplate: BoilerplateFilter) -> Self {
        let bounded_end = GOAL_PATTERNS.iter().map(|p| {
            // The literal family has no lazy tail to terminate.
            if p.contains('(') {
                format!("(?i){}{}", p, END)
            } else {
                format!("(?i){}", p)
            }
        });

        Self {
            patterns: bounded_end.map(|p| Regex::new(&p).unwrap()).collect(),
            boilerplate,
        }
    }

    /// Extract goals from newline-collapsed text, in pattern order then
    /// document order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut goals: Vec<String> = Vec::new();

        let candidates = self.patterns.iter().flat_map(|re| {
            re.captures_iter(text)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| m.as_str())
        });

        for raw in candidates {
            let goal = clean_goal(raw);
            if self.accepts(&goal) && !goals.contains(&goal) {
                goals.push(goal);
                if goals.len() == MAX_GOALS {
                    break;
                }
            }
        }

        goals
    }

    fn accepts(&self, goal: &str) -> bool {
        goal.chars().count() > MIN_GOAL_CHARS
            && !self.boilerplate.is_boilerplate(goal)
            && !BARE_NUMBER.is_match(goal)
    }
}

impl Default for GoalExtractor {
    fn default() -> Self {
        Self::new(BoilerplateFilter::new())
    }
}

/// Drop the first "by N" / "by N%" qualifier and squeeze whitespace.
fn clean_goal(raw: &str) -> String {
    let stripped = BY_PERCENT.replace(raw, "");
    MULTI_SPACE.replace_all(stripped.trim(), " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn extract(text: &str) -> Vec<String> {
        GoalExtractor::default().extract(text)
    }

    #[test]
    fn test_target_goal() {
        let goals = extract("Our target is to reduce water consumption across all plants. Other news follows.");
        assert_eq!(goals, vec!["is to reduce water consumption across all plants"]);
    }

    #[test]
    fn test_by_percent_stripped() {
        let goals = extract("We pledge to cut landfill waste by 40% across all sites.");
        assert_eq!(goals, vec!["cut landfill waste across all sites"]);
    }

    #[test]
    fn test_net_zero_literal() {
        let goals = extract("The group is on a path to Net Zero Emissions");
        assert!(goals.contains(&"Net Zero Emissions".to_string()));
    }

    #[test]
    fn test_percentage_phrase() {
        let goals = extract("We delivered a 30% reduction in packaging material use.");
        assert!(goals.contains(&"30% reduction in packaging material use".to_string()));
    }

    #[test]
    fn test_commitment_spans_words() {
        let goals = extract("Our commitment as a group is to source renewable electricity for every plant.");
        assert!(goals.iter().any(|g| g.starts_with("source renewable electricity")));
    }

    #[test]
    fn test_decimal_inside_sentence_does_not_end_goal() {
        let goals = extract("We plan to reduce diesel use from 2.5 million litres annually. Next topic.");
        assert_eq!(goals, vec!["diesel use from 2.5 million litres annually"]);
    }

    #[test]
    fn test_pledge_with_decimal_amount() {
        let goals = extract("We pledge to invest 3.2 crore rupees in rainwater harvesting. Next topic.");
        assert_eq!(goals, vec!["invest 3.2 crore rupees in rainwater harvesting"]);
    }

    #[test]
    fn test_percentage_phrase_with_decimal() {
        let goals = extract("We achieved a 12% reduction in fuel use across 1.5 million km driven.");
        assert!(goals.contains(&"12% reduction in fuel use across 1.5 million km driven".to_string()));
    }

    #[test]
    fn test_boilerplate_rejected() {
        let goals = extract("Our goal is described in the Executive Summary section.");
        assert!(goals.is_empty());
    }

    #[test]
    fn test_short_and_numeric_rejected() {
        assert!(extract("Target: 12.5. Goal: tiny.").is_empty());
    }

    #[test]
    fn test_dedup_and_cap() {
        let text = "Our target is to plant trees on every campus. \
                    Our target is to plant trees on every campus. \
                    We pledge to restore wetlands near plant one. \
                    We pledge to restore wetlands near plant two. \
                    We pledge to restore wetlands near plant three. \
                    We pledge to restore wetlands near plant four. \
                    We pledge to restore wetlands near plant five.";
        let goals = extract(text);
        assert_eq!(goals.len(), MAX_GOALS);
        let unique: HashSet<&String> = goals.iter().collect();
        assert_eq!(unique.len(), goals.len());
        assert_eq!(goals[0], "is to plant trees on every campus");
    }
}
