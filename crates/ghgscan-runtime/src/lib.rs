//! Runtime: the document analysis pipeline and what is derived from its results.
//!
//! Provides single-document and batch analysis, the portfolio rollup over
//! previously extracted results, and utility-bill / ESG scoring.

pub mod orchestrator;
pub mod rollup;
pub mod scoring;
pub mod types;

pub use orchestrator::Analyzer;
pub use rollup::{calculate_emissions, RollupReport, RollupRequest};
pub use scoring::{ScoreRequest, ScoreResponse};
pub use types::*;
