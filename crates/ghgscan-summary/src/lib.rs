//! Report summaries from a hosted chat model, with a deterministic
//! rule-based fallback when the model is absent or fails.

pub mod config;
pub mod providers;
pub mod summarizer;
pub mod types;

pub use config::{LLMConfig, ResolvedProvider};
pub use summarizer::{LlmSummarizer, RuleBasedSummarizer, Summarizer, SummaryEngine};
pub use types::*;
