//! Shared application state.

use ghgscan_core::GhgScanConfig;
use ghgscan_runtime::Analyzer;
use ghgscan_summary::LLMConfig;
use parking_lot::RwLock;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: GhgScanConfig,
    pub llm_config: RwLock<LLMConfig>,
    pub analyzer: Analyzer,
}

impl AppState {
    /// Load provider config from the data directory and build the pipeline.
    pub fn new(config: GhgScanConfig) -> Self {
        let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
        let analyzer = Analyzer::from_config(&config, &llm_config);
        Self::with_analyzer(config, llm_config, analyzer)
    }

    pub fn with_analyzer(config: GhgScanConfig, llm_config: LLMConfig, analyzer: Analyzer) -> Self {
        Self {
            config,
            llm_config: RwLock::new(llm_config),
            analyzer,
        }
    }
}
