//! ghgscan ingest: text acquisition, unit normalization and pattern-based
//! extraction of emissions, company, goals and ESG statements.

pub mod acquire;
pub mod extract;
pub mod units;

pub use acquire::{
    content_hash, is_supported_media_type, media_type_from_filename, DocumentKind, DocumentTextAcquirer, RawDocument,
    TextAcquirer,
};
pub use extract::{
    CompanyInfo, EmissionsRecord, EsgRecord, ExtractionResult, Extractors, NOT_AVAILABLE, Scope,
    ScopeValue,
};
pub use units::UnitTable;
