//! Pattern-based fact extraction from sustainability report text.
//!
//! Each extractor runs an ordered cascade of regular expressions over the
//! document text and degrades to a default value instead of failing:
//! unresolved scopes stay "N/A", unknown company/year fall back to
//! placeholder strings, goal and ESG lists may be empty.

pub mod boilerplate;
pub mod company;
pub mod emissions;
pub mod esg;
pub mod goals;

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use boilerplate::BoilerplateFilter;
pub use company::CompanyExtractor;
pub use emissions::EmissionsExtractor;
pub use esg::EsgExtractor;
pub use goals::GoalExtractor;

/// Sentinel for an unresolved field.
pub const NOT_AVAILABLE: &str = "N/A";

/// GHG Protocol reporting category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Scope1,
    Scope2,
    Scope3,
    Total,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Scope::Scope1, Scope::Scope2, Scope::Scope3, Scope::Total];

    /// Field name used in serialized results.
    pub fn key(&self) -> &'static str {
        match self {
            Scope::Scope1 => "scope_1",
            Scope::Scope2 => "scope_2",
            Scope::Scope3 => "scope_3",
            Scope::Total => "total_ghg_emissions",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A normalized emissions figure in tCO₂e, or the "N/A" sentinel.
///
/// Serialized as a string (`"1250"` or `"N/A"`) so consumers see the same
/// shape whether or not the scope was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScopeValue {
    Reported(f64),
    #[default]
    NotAvailable,
}

impl ScopeValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            ScopeValue::Reported(v) => Some(*v),
            ScopeValue::NotAvailable => None,
        }
    }

    pub fn is_reported(&self) -> bool {
        matches!(self, ScopeValue::Reported(_))
    }
}

impl fmt::Display for ScopeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeValue::Reported(v) => write!(f, "{}", v),
            ScopeValue::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for ScopeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScopeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(v)) => ScopeValue::Reported(v),
            Some(Raw::Text(s)) => crate::units::parse_number(&s)
                .map(ScopeValue::Reported)
                .unwrap_or(ScopeValue::NotAvailable),
            None => ScopeValue::NotAvailable,
        })
    }
}

/// Emissions per scope, in tCO₂e.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionsRecord {
    #[serde(default)]
    pub scope_1: ScopeValue,
    #[serde(default)]
    pub scope_2: ScopeValue,
    #[serde(default)]
    pub scope_3: ScopeValue,
    #[serde(default)]
    pub total_ghg_emissions: ScopeValue,
}

impl EmissionsRecord {
    pub fn get(&self, scope: Scope) -> ScopeValue {
        match scope {
            Scope::Scope1 => self.scope_1,
            Scope::Scope2 => self.scope_2,
            Scope::Scope3 => self.scope_3,
            Scope::Total => self.total_ghg_emissions,
        }
    }

    pub fn set(&mut self, scope: Scope, value: ScopeValue) {
        let slot = match scope {
            Scope::Scope1 => &mut self.scope_1,
            Scope::Scope2 => &mut self.scope_2,
            Scope::Scope3 => &mut self.scope_3,
            Scope::Total => &mut self.total_ghg_emissions,
        };
        *slot = value;
    }
}

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_YEAR: &str = "Unknown Year";

/// Reporting entity and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub company_name: String,
    /// Formatted as `FY<year>`.
    pub report_year: String,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            company_name: UNKNOWN_COMPANY.into(),
            report_year: UNKNOWN_YEAR.into(),
        }
    }
}

/// Categorized ESG statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsgRecord {
    pub environmental: Vec<String>,
    pub social: Vec<String>,
    pub governance: Vec<String>,
}

/// Combined extraction result for a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub company: CompanyInfo,
    pub emissions: EmissionsRecord,
    pub goals: Vec<String>,
    pub esg: EsgRecord,
}

/// All extractors with their compiled pattern cascades.
///
/// Built once and shared read-only across pipeline runs.
pub struct Extractors {
    pub emissions: EmissionsExtractor,
    pub company: CompanyExtractor,
    pub goals: GoalExtractor,
    pub esg: EsgExtractor,
}

impl Extractors {
    pub fn new() -> Self {
        let boilerplate = BoilerplateFilter::new();
        Self {
            emissions: EmissionsExtractor::new(),
            company: CompanyExtractor::new(),
            goals: GoalExtractor::new(boilerplate.clone()),
            esg: EsgExtractor::new(boilerplate),
        }
    }

    /// Run every extractor over the same document text.
    ///
    /// Each extractor receives the text form it expects: emissions get the
    /// lower-cased, whitespace-collapsed text; company/year the raw text;
    /// goals and ESG the newline-collapsed text.
    pub fn extract_all(&self, text: &str) -> ExtractionResult {
        let lowered = lowercase_collapsed(text);
        let flattened = collapse_lines(text);

        ExtractionResult {
            company: self.company.extract(text),
            emissions: self.emissions.extract(&lowered),
            goals: self.goals.extract(&flattened),
            esg: self.esg.extract(&flattened),
        }
    }
}

impl Default for Extractors {
    fn default() -> Self {
        Self::new()
    }
}

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\s+").unwrap());

/// Lower-case and collapse every whitespace run to a single space.
pub fn lowercase_collapsed(text: &str) -> String {
    WHITESPACE_RUN.replace_all(&text.to_lowercase(), " ").into_owned()
}

/// Join lines with single spaces and squeeze repeated whitespace.
pub fn collapse_lines(text: &str) -> String {
    let joined = LINE_BREAK.replace_all(text, " ");
    MULTI_SPACE.replace_all(&joined, " ").trim().to_string()
}
