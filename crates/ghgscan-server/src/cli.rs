//! `ghgscan analyze`: run the pipeline on a local file.

use std::path::Path;

use anyhow::Context;
use ghgscan_core::GhgScanConfig;
use ghgscan_ingest::{media_type_from_filename, RawDocument};
use ghgscan_runtime::{AnalysisResult, Analyzer};
use ghgscan_summary::LLMConfig;

/// Analyze one file with the production pipeline.
pub async fn analyze_file(config: &GhgScanConfig, path: &Path, include_summary: bool) -> anyhow::Result<AnalysisResult> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("File path has no file name")?
        .to_string();

    let mut doc = RawDocument::new(bytes, filename);
    if let Some(media_type) = media_type_from_filename(&doc.filename) {
        doc = doc.with_media_type(media_type);
    }

    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
    let analyzer = Analyzer::from_config(config, &llm_config);
    let result = analyzer.analyze_document(doc, include_summary).await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = GhgScanConfig::from_env(dir.path()).unwrap();
        let err = analyze_file(&config, &dir.path().join("absent.pdf"), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("absent.pdf"));
    }

    #[tokio::test]
    async fn test_empty_file_has_no_text() {
        let dir = tempfile::tempdir().unwrap();
        let config = GhgScanConfig::from_env(dir.path()).unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();

        let err = analyze_file(&config, &path, false).await.unwrap_err();
        assert_eq!(err.to_string(), "No text could be extracted from the document");
    }
}
