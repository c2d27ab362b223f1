//! Summary strategies and the primary/fallback engine.
//!
//! The `Summarizer` trait abstracts over summary generation.
//! Implementations:
//! - `LlmSummarizer`: hosted chat model with a fixed prompt template
//! - `RuleBasedSummarizer`: deterministic sentences from the emissions record
//!   and keyword presence in the document text

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ghgscan_core::{Error, Result};
use ghgscan_ingest::{EmissionsRecord, Scope};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::{LLMConfig, ResolvedProvider};
use crate::providers;
use crate::types::{ChatMessage, LLMProvider};

/// Characters of report text sent to the hosted model.
pub const PROMPT_TEXT_CHARS: usize = 3000;
pub const SUMMARY_MAX_TOKENS: usize = 300;

const PROMPT_INSTRUCTION: &str = "Analyze this sustainability report and provide 5 key insights about \
the company's environmental performance, focusing on emissions, goals, and achievements. Text: ";

/// Produces summary lines for a document.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, emissions: &EmissionsRecord) -> Result<Vec<String>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Deterministic summary. Never fails.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedSummarizer;

impl RuleBasedSummarizer {
    pub fn lines(&self, text: &str, emissions: &EmissionsRecord) -> Vec<String> {
        let mut summary = Vec::new();

        for scope in [Scope::Total, Scope::Scope1, Scope::Scope2, Scope::Scope3] {
            if let Some(value) = emissions.get(scope).value() {
                summary.push(scope_sentence(scope, value));
            }
        }

        // Plain case-sensitive substring checks on the raw text.
        if text.contains("reduction") || text.contains("decrease") {
            summary.push("Company demonstrates commitment to emission reduction initiatives".to_string());
        }
        if text.contains("renewable") || text.contains("solar") || text.contains("wind") {
            summary.push("Investment in renewable energy sources identified".to_string());
        }

        summary
    }
}

fn scope_sentence(scope: Scope, value: f64) -> String {
    match scope {
        Scope::Total => format!("Total GHG emissions reported: {} tCO₂e", value),
        Scope::Scope1 => format!("Scope 1 emissions from direct operations: {} tCO₂e", value),
        Scope::Scope2 => format!("Scope 2 emissions from purchased energy: {} tCO₂e", value),
        Scope::Scope3 => format!("Scope 3 emissions across the value chain: {} tCO₂e", value),
    }
}

#[async_trait]
impl Summarizer for RuleBasedSummarizer {
    async fn summarize(&self, text: &str, emissions: &EmissionsRecord) -> Result<Vec<String>> {
        Ok(self.lines(text, emissions))
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}

/// Hosted chat model summary.
pub struct LlmSummarizer {
    client: Client,
    provider: LLMProvider,
    model: String,
    api_key: String,
    name: String,
}

impl LlmSummarizer {
    pub fn new(selection: ResolvedProvider, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            name: format!("{}:{}", selection.provider, selection.model),
            provider: selection.provider,
            model: selection.model,
            api_key: selection.api_key,
        })
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str, _emissions: &EmissionsRecord) -> Result<Vec<String>> {
        let prompt = build_prompt(text);
        let response = providers::complete(
            &self.client,
            self.provider,
            &self.model,
            &self.api_key,
            &[ChatMessage::user(prompt)],
            SUMMARY_MAX_TOKENS,
        )
        .await?;

        let lines = split_lines(&response);
        if lines.is_empty() {
            return Err(Error::Summary(format!("{} returned an empty summary", self.name)));
        }
        Ok(lines)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fixed prompt over the first [`PROMPT_TEXT_CHARS`] characters of the report.
pub fn build_prompt(text: &str) -> String {
    let excerpt: String = text.chars().take(PROMPT_TEXT_CHARS).collect();
    format!("{}{}", PROMPT_INSTRUCTION, excerpt)
}

/// Non-empty lines of a model response, in order.
pub fn split_lines(response: &str) -> Vec<String> {
    response
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Primary strategy with an always-available rule-based fallback.
#[derive(Clone)]
pub struct SummaryEngine {
    primary: Option<Arc<dyn Summarizer>>,
    fallback: RuleBasedSummarizer,
}

impl SummaryEngine {
    /// Engine with no hosted model.
    pub fn rule_based() -> Self {
        Self {
            primary: None,
            fallback: RuleBasedSummarizer,
        }
    }

    pub fn with_primary(primary: Arc<dyn Summarizer>) -> Self {
        Self {
            primary: Some(primary),
            fallback: RuleBasedSummarizer,
        }
    }

    /// Build from provider config. No resolvable provider means rule-based only.
    pub fn from_config(config: &LLMConfig, timeout: Duration) -> Self {
        let Some(selection) = config.resolve_provider() else {
            info!("No summary provider configured, using rule-based summaries");
            return Self::rule_based();
        };

        match LlmSummarizer::new(selection, timeout) {
            Ok(summarizer) => {
                info!("Summary provider: {}", summarizer.name());
                Self::with_primary(Arc::new(summarizer))
            }
            Err(e) => {
                warn!("Summary provider unavailable, using rule-based summaries: {}", e);
                Self::rule_based()
            }
        }
    }

    pub fn primary_name(&self) -> Option<&str> {
        self.primary.as_deref().map(|p| p.name())
    }

    /// Summarize with the primary strategy, falling back on any failure.
    pub async fn summarize(&self, text: &str, emissions: &EmissionsRecord) -> Vec<String> {
        if let Some(primary) = &self.primary {
            match primary.summarize(text, emissions).await {
                Ok(lines) => {
                    debug!("{} produced {} summary lines", primary.name(), lines.len());
                    return lines;
                }
                Err(e) => {
                    warn!("{} summary failed, falling back to rule-based: {}", primary.name(), e);
                }
            }
        }
        self.fallback.lines(text, emissions)
    }
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self::rule_based()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghgscan_ingest::ScopeValue;

    struct FailingSummarizer;

    #[async_trait]
    impl Summarizer for FailingSummarizer {
        async fn summarize(&self, _text: &str, _emissions: &EmissionsRecord) -> Result<Vec<String>> {
            Err(Error::Http("connection refused".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct FixedSummarizer(Vec<String>);

    #[async_trait]
    impl Summarizer for FixedSummarizer {
        async fn summarize(&self, _text: &str, _emissions: &EmissionsRecord) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn emissions() -> EmissionsRecord {
        EmissionsRecord {
            scope_1: ScopeValue::Reported(1250.0),
            total_ghg_emissions: ScopeValue::Reported(5000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_rule_based_lines() {
        let lines = RuleBasedSummarizer.lines("We expanded solar capacity and saw a reduction in waste.", &emissions());
        assert_eq!(
            lines,
            vec![
                "Total GHG emissions reported: 5000 tCO₂e",
                "Scope 1 emissions from direct operations: 1250 tCO₂e",
                "Company demonstrates commitment to emission reduction initiatives",
                "Investment in renewable energy sources identified",
            ]
        );
    }

    #[test]
    fn test_rule_based_keywords_case_sensitive() {
        let lines = RuleBasedSummarizer.lines("Renewable Energy and Wind Farms", &EmissionsRecord::default());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_prompt_truncated_by_chars() {
        let text = "₂".repeat(PROMPT_TEXT_CHARS + 50);
        let prompt = build_prompt(&text);
        assert!(prompt.starts_with(PROMPT_INSTRUCTION));
        assert_eq!(prompt.chars().count(), PROMPT_INSTRUCTION.chars().count() + PROMPT_TEXT_CHARS);
    }

    #[test]
    fn test_split_lines() {
        let lines = split_lines("1. Emissions fell\n\n   \n2. Solar expanded\r\n");
        assert_eq!(lines, vec!["1. Emissions fell", "2. Solar expanded"]);
    }

    #[tokio::test]
    async fn test_engine_falls_back_on_failure() {
        let engine = SummaryEngine::with_primary(Arc::new(FailingSummarizer));
        let lines = engine.summarize("no keywords here", &emissions()).await;
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Total GHG emissions reported"));
    }

    #[tokio::test]
    async fn test_engine_prefers_primary() {
        let engine = SummaryEngine::with_primary(Arc::new(FixedSummarizer(vec!["insight".into()])));
        assert_eq!(engine.primary_name(), Some("fixed"));
        assert_eq!(engine.summarize("text", &emissions()).await, vec!["insight"]);
    }

    #[tokio::test]
    async fn test_engine_without_provider() {
        let engine = SummaryEngine::from_config(&LLMConfig::default(), Duration::from_secs(5));
        assert!(engine.primary_name().is_none());
        let lines = engine.summarize("a decrease was observed", &EmissionsRecord::default()).await;
        assert_eq!(lines, vec!["Company demonstrates commitment to emission reduction initiatives"]);
    }
}
