//! Analysis result model.

use ghgscan_ingest::{CompanyInfo, EmissionsRecord, EsgRecord, ExtractionResult, RawDocument};
use serde::{Deserialize, Serialize};

/// Unit every emissions figure is normalized to.
pub const EMISSIONS_UNIT: &str = "tCO₂e";

/// Tag identifying how the facts were extracted.
pub const EXTRACTION_METHOD: &str = "rust_regex";

/// Pipeline stage for a single document analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Start,
    TextAcquired,
    EntitiesExtracted,
    Summarized,
    Done,
    Failed,
}

/// Everything extracted from one document, serialized as a flat record.
///
/// Unresolved scopes and unknown company/year carry string sentinels rather
/// than being omitted. `ai_summary` is omitted unless a summary was requested
/// and produced at least one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub company: CompanyInfo,
    #[serde(flatten)]
    pub emissions: EmissionsRecord,
    pub unit: String,
    pub sustainability_goals: Vec<String>,
    pub esg_data: EsgRecord,
    pub extraction_timestamp: String,
    pub extraction_method: String,
    pub filename: String,
    pub file_size: usize,
    /// SHA-256 of the original bytes.
    pub content_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<Vec<String>>,
}

impl AnalysisResult {
    pub fn assemble(extraction: ExtractionResult, doc: &RawDocument, summary: Vec<String>) -> Self {
        Self {
            company: extraction.company,
            emissions: extraction.emissions,
            unit: EMISSIONS_UNIT.to_string(),
            sustainability_goals: extraction.goals,
            esg_data: extraction.esg,
            extraction_timestamp: now_iso(),
            extraction_method: EXTRACTION_METHOD.to_string(),
            filename: doc.filename.clone(),
            file_size: doc.len(),
            content_hash: ghgscan_ingest::content_hash(&doc.bytes),
            ai_summary: (!summary.is_empty()).then_some(summary),
        }
    }
}

/// A failed batch item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub filename: String,
    pub error: String,
}

/// One entry of a batch report: a full result or a per-file failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Analyzed(Box<AnalysisResult>),
    Failed(BatchFailure),
}

impl BatchItem {
    pub fn filename(&self) -> &str {
        match self {
            BatchItem::Analyzed(result) => &result.filename,
            BatchItem::Failed(failure) => &failure.filename,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, BatchItem::Failed(_))
    }
}

/// Batch analysis output, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<BatchItem>,
    pub total_processed: usize,
    pub timestamp: String,
}

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghgscan_ingest::ScopeValue;

    fn sample() -> AnalysisResult {
        let mut extraction = ExtractionResult::default();
        extraction.emissions.scope_1 = ScopeValue::Reported(1250.0);
        extraction.goals = vec!["cut landfill waste across all sites".into()];
        let doc = RawDocument::new(b"%PDF-1.4".to_vec(), "report.pdf");
        AnalysisResult::assemble(extraction, &doc, Vec::new())
    }

    #[test]
    fn test_flat_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["company_name"], "Unknown Company");
        assert_eq!(json["report_year"], "Unknown Year");
        assert_eq!(json["scope_1"], "1250");
        assert_eq!(json["scope_2"], "N/A");
        assert_eq!(json["unit"], "tCO₂e");
        assert_eq!(json["extraction_method"], EXTRACTION_METHOD);
        assert_eq!(json["file_size"], 8);
        assert_eq!(json["content_hash"].as_str().unwrap().len(), 64);
        assert!(json["esg_data"]["environmental"].is_array());
        assert!(json.get("company").is_none());
        assert!(json.get("ai_summary").is_none());
    }

    #[test]
    fn test_summary_included_when_present() {
        let doc = RawDocument::new(vec![1, 2, 3], "scan.png");
        let result = AnalysisResult::assemble(ExtractionResult::default(), &doc, vec!["line".into()]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ai_summary"], serde_json::json!(["line"]));
    }

    #[test]
    fn test_result_reads_back() {
        let result = sample();
        let json = serde_json::to_string(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_batch_item_shapes() {
        let failed = BatchItem::Failed(BatchFailure {
            filename: "empty.pdf".into(),
            error: "No text could be extracted from the document".into(),
        });
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json, serde_json::json!({
            "filename": "empty.pdf",
            "error": "No text could be extracted from the document",
        }));

        let analyzed = BatchItem::Analyzed(Box::new(sample()));
        assert_eq!(analyzed.filename(), "report.pdf");
        assert!(!analyzed.is_failure());
        assert_eq!(serde_json::to_value(&analyzed).unwrap()["scope_1"], "1250");
    }
}
