//! Analyzer: runs the document pipeline and batch analysis.
//!
//! One analysis is a linear chain: acquire text, extract entities, optionally
//! summarize, assemble. Empty text after acquisition is the only fatal
//! condition; every other failure degrades in-band.

use std::sync::Arc;

use futures::future::join_all;
use ghgscan_core::{Error, GhgScanConfig, Result};
use ghgscan_ingest::{DocumentTextAcquirer, Extractors, RawDocument, TextAcquirer};
use ghgscan_summary::{LLMConfig, SummaryEngine};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::types::*;

/// Shared pipeline: acquirer, compiled extractors and the summary engine.
pub struct Analyzer {
    acquirer: Arc<dyn TextAcquirer>,
    extractors: Arc<Extractors>,
    summary: RwLock<SummaryEngine>,
}

impl Analyzer {
    pub fn new(acquirer: Arc<dyn TextAcquirer>, summary: SummaryEngine) -> Self {
        Self {
            acquirer,
            extractors: Arc::new(Extractors::new()),
            summary: RwLock::new(summary),
        }
    }

    /// Build the production pipeline from service config and provider config.
    pub fn from_config(config: &GhgScanConfig, llm: &LLMConfig) -> Self {
        let acquirer = Arc::new(DocumentTextAcquirer::new(config.ocr.clone()));
        let summary = SummaryEngine::from_config(llm, config.summary_timeout);
        info!(
            "Analyzer initialized: ocr={} ({}), summary={}",
            config.ocr.tesseract_path,
            config.ocr.language,
            summary.primary_name().unwrap_or("rule-based")
        );
        Self::new(acquirer, summary)
    }

    pub fn extractors(&self) -> &Extractors {
        &self.extractors
    }

    /// Replace the summary engine, e.g. after a provider config update.
    pub fn set_summary_engine(&self, engine: SummaryEngine) {
        *self.summary.write() = engine;
    }

    pub fn summary_engine(&self) -> SummaryEngine {
        self.summary.read().clone()
    }

    /// Analyze one document.
    ///
    /// Fails only with `InvalidInput` (no filename) or `NoTextExtracted`.
    pub async fn analyze_document(&self, doc: RawDocument, request_summary: bool) -> Result<AnalysisResult> {
        if doc.filename.trim().is_empty() {
            return Err(Error::InvalidInput("filename is required".into()));
        }

        let mut run = PipelineRun::new(&doc.filename);
        info!("Analyzing document: {} ({} bytes)", doc.filename, doc.len());

        let text = self.acquirer.acquire(&doc).await;
        if text.trim().is_empty() {
            run.advance(PipelineStage::Failed);
            return Err(Error::NoTextExtracted);
        }
        run.advance(PipelineStage::TextAcquired);
        debug!("Text extracted, length: {}", text.len());

        let extraction = self.extractors.extract_all(&text);
        run.advance(PipelineStage::EntitiesExtracted);
        info!(
            "{}: company={:?} year={:?} scope_1={} scope_2={} scope_3={} total={} goals={}",
            doc.filename,
            extraction.company.company_name,
            extraction.company.report_year,
            extraction.emissions.scope_1,
            extraction.emissions.scope_2,
            extraction.emissions.scope_3,
            extraction.emissions.total_ghg_emissions,
            extraction.goals.len()
        );

        let summary = if request_summary {
            let engine = self.summary_engine();
            let lines = engine.summarize(&text, &extraction.emissions).await;
            run.advance(PipelineStage::Summarized);
            lines
        } else {
            Vec::new()
        };

        let result = AnalysisResult::assemble(extraction, &doc, summary);
        run.advance(PipelineStage::Done);
        Ok(result)
    }

    /// Analyze documents concurrently. Each failure is reported per item and
    /// output order matches input order.
    pub async fn analyze_batch(&self, docs: Vec<RawDocument>, request_summary: bool) -> BatchReport {
        let runs = docs.into_iter().map(|doc| self.analyze_item(doc, request_summary));
        let results = join_all(runs).await;

        let failed = results.iter().filter(|r| r.is_failure()).count();
        info!("Batch complete: {} documents, {} failed", results.len(), failed);

        BatchReport {
            total_processed: results.len(),
            results,
            timestamp: now_iso(),
        }
    }

    async fn analyze_item(&self, doc: RawDocument, request_summary: bool) -> BatchItem {
        let filename = doc.filename.clone();
        match self.analyze_document(doc, request_summary).await {
            Ok(result) => BatchItem::Analyzed(Box::new(result)),
            Err(e) => {
                warn!("Batch item {} failed: {}", filename, e);
                BatchItem::Failed(BatchFailure {
                    filename,
                    error: e.to_string(),
                })
            }
        }
    }
}

/// Stage bookkeeping for one analysis.
struct PipelineRun<'a> {
    filename: &'a str,
    stage: PipelineStage,
}

impl<'a> PipelineRun<'a> {
    fn new(filename: &'a str) -> Self {
        Self {
            filename,
            stage: PipelineStage::Start,
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        debug!("{}: {:?} -> {:?}", self.filename, self.stage, next);
        self.stage = next;
    }
}
