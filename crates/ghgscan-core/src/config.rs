//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Paths to ghgscan data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Hosted-model provider configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            llm_config_file: root.join("llm-config.json"),
            root,
        };
        std::fs::create_dir_all(&paths.root)?;
        Ok(paths)
    }
}

/// Image OCR settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Path to the tesseract binary (relies on PATH by default).
    pub tesseract_path: String,
    /// Tesseract language model.
    pub language: String,
    /// Width images are resized to before recognition.
    pub target_width: u32,
    /// Upper bound on a single OCR run.
    pub timeout: Duration,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".into(),
            language: "eng".into(),
            target_width: 1200,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Top-level ghgscan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhgScanConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    pub ocr: OcrSettings,
    /// Upper bound on the hosted-model summary request.
    pub summary_timeout: Duration,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
    /// Maximum number of files in one batch request.
    pub max_batch_files: usize,
}

impl GhgScanConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = env_parse("PORT").unwrap_or(3001);

        let defaults = OcrSettings::default();
        let ocr = OcrSettings {
            tesseract_path: std::env::var("GHGSCAN_TESSERACT").unwrap_or(defaults.tesseract_path),
            language: std::env::var("GHGSCAN_OCR_LANG").unwrap_or(defaults.language),
            target_width: env_parse("GHGSCAN_OCR_WIDTH").unwrap_or(defaults.target_width),
            timeout: env_parse("GHGSCAN_OCR_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        };

        let summary_timeout = Duration::from_secs(env_parse("GHGSCAN_SUMMARY_TIMEOUT_SECS").unwrap_or(30));
        let max_upload_mb: usize = env_parse("GHGSCAN_MAX_UPLOAD_MB").unwrap_or(50);
        let max_batch_files = env_parse("GHGSCAN_MAX_BATCH_FILES").unwrap_or(10);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            ocr,
            summary_timeout,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            max_batch_files,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_created() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let paths = DataPaths::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(paths.llm_config_file, root.join("llm-config.json"));
    }

    #[test]
    fn test_ocr_defaults() {
        let ocr = OcrSettings::default();
        assert_eq!(ocr.language, "eng");
        assert_eq!(ocr.target_width, 1200);
    }
}
