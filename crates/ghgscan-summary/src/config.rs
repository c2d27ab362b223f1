//! Summary provider configuration persistence and provider selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{LLMConfigResponse, LLMConfigUpdate, LLMProvider};

pub const DEFAULT_TOGETHER_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

pub const TOGETHER_MODELS: &[&str] = &[
    "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo",
    "meta-llama/Llama-3.3-70B-Instruct-Turbo",
    "mistralai/Mixtral-8x7B-Instruct-v0.1",
];
pub const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"];
pub const ANTHROPIC_MODELS: &[&str] = &["claude-3-5-haiku-20241022", "claude-3-5-sonnet-20241022"];
pub const GROQ_MODELS: &[&str] = &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"];

/// Stored provider configuration (persisted to llm-config.json).
/// Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub preferred_provider: String,
    pub together_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub together_model: String,
    pub openai_model: String,
    pub anthropic_model: String,
    pub groq_model: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            together_api_key: None,
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            together_model: DEFAULT_TOGETHER_MODEL.into(),
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
            config_path: PathBuf::new(),
        }
    }
}

/// A resolved provider selection.
#[derive(Clone)]
pub struct ResolvedProvider {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: String,
}

impl std::fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", config_path.display(), e);
                LLMConfig::default()
            }),
            Err(_) => LLMConfig::default(),
        };

        config.config_path = config_path.to_path_buf();

        for provider in AUTO_ORDER {
            let (key, _) = config.slots_mut(provider);
            if key.is_none() {
                *key = env_key(key_env_var(provider));
            }
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved summary provider config to {}", self.config_path.display());
        Ok(())
    }

    /// Merge an update. Absent fields are kept; an empty key clears it.
    pub fn apply_update(&mut self, update: &LLMConfigUpdate) {
        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.trim().to_lowercase();
        }

        let per_provider = [
            (LLMProvider::Together, &update.together_api_key, &update.together_model),
            (LLMProvider::OpenAI, &update.openai_api_key, &update.openai_model),
            (LLMProvider::Anthropic, &update.anthropic_api_key, &update.anthropic_model),
            (LLMProvider::Groq, &update.groq_api_key, &update.groq_model),
        ];
        for (provider, key, model) in per_provider {
            let (key_slot, model_slot) = self.slots_mut(provider);
            if let Some(k) = key {
                *key_slot = non_empty(k);
            }
            if let Some(m) = model {
                *model_slot = m.clone();
            }
        }
    }

    /// Provider, model and key to summarize with: the explicit preference,
    /// or in `auto` mode the first provider in [`AUTO_ORDER`] with a key.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        if self.preferred_provider != "auto" {
            return LLMProvider::from_name(&self.preferred_provider).and_then(|p| self.selection(p));
        }
        AUTO_ORDER.into_iter().find_map(|p| self.selection(p))
    }

    fn selection(&self, provider: LLMProvider) -> Option<ResolvedProvider> {
        let (key, model) = self.slots(provider);
        key.as_ref().map(|k| ResolvedProvider {
            provider,
            model: model.clone(),
            api_key: k.clone(),
        })
    }

    fn slots(&self, provider: LLMProvider) -> (&Option<String>, &String) {
        match provider {
            LLMProvider::Together => (&self.together_api_key, &self.together_model),
            LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model),
            LLMProvider::Anthropic => (&self.anthropic_api_key, &self.anthropic_model),
            LLMProvider::Groq => (&self.groq_api_key, &self.groq_model),
        }
    }

    fn slots_mut(&mut self, provider: LLMProvider) -> (&mut Option<String>, &mut String) {
        match provider {
            LLMProvider::Together => (&mut self.together_api_key, &mut self.together_model),
            LLMProvider::OpenAI => (&mut self.openai_api_key, &mut self.openai_model),
            LLMProvider::Anthropic => (&mut self.anthropic_api_key, &mut self.anthropic_model),
            LLMProvider::Groq => (&mut self.groq_api_key, &mut self.groq_model),
        }
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> LLMConfigResponse {
        let resolved = self.resolve_provider();
        LLMConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            together_configured: self.together_api_key.is_some(),
            openai_configured: self.openai_api_key.is_some(),
            anthropic_configured: self.anthropic_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
            together_model: self.together_model.clone(),
            openai_model: self.openai_model.clone(),
            anthropic_model: self.anthropic_model.clone(),
            groq_model: self.groq_model.clone(),
            active_provider: resolved.as_ref().map(|r| r.provider.to_string()),
            available_models: self.available_models(),
        }
    }

    /// Get available models for the active provider.
    pub fn available_models(&self) -> Vec<String> {
        let models: &[&str] = match self.resolve_provider().map(|r| r.provider) {
            Some(LLMProvider::Together) => TOGETHER_MODELS,
            Some(LLMProvider::OpenAI) => OPENAI_MODELS,
            Some(LLMProvider::Anthropic) => ANTHROPIC_MODELS,
            Some(LLMProvider::Groq) => GROQ_MODELS,
            None => &[],
        };
        models.iter().map(|s| s.to_string()).collect()
    }
}

/// Resolution order in `auto` mode.
pub const AUTO_ORDER: [LLMProvider; 4] = [
    LLMProvider::Together,
    LLMProvider::Anthropic,
    LLMProvider::Groq,
    LLMProvider::OpenAI,
];

fn key_env_var(provider: LLMProvider) -> &'static str {
    match provider {
        LLMProvider::Together => "TOGETHER_API_KEY",
        LLMProvider::OpenAI => "OPENAI_API_KEY",
        LLMProvider::Anthropic => "ANTHROPIC_API_KEY",
        LLMProvider::Groq => "GROQ_API_KEY",
    }
}

fn env_key(var: &str) -> Option<String> {
    std::env::var(var).ok().and_then(|k| non_empty(&k))
}

fn non_empty(key: &str) -> Option<String> {
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}
