//! Portfolio rollup over previously extracted results.
//!
//! Pure aggregation: no text is re-read. The total sums every reported
//! scope 1/2/3 value across all documents; the per-scope breakdown keeps
//! the value from the last document that reported that scope.

use ghgscan_ingest::units::round2;
use ghgscan_ingest::{EmissionsRecord, Scope};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{now_iso, EMISSIONS_UNIT};

/// Request body: any records carrying scope keys. Other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RollupRequest {
    pub documents: Vec<EmissionsRecord>,
}

/// Last-reported value per scope. Scopes nobody reported are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScopeBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_3: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollupReport {
    pub total_emissions: f64,
    pub breakdown: ScopeBreakdown,
    pub unit: String,
    pub calculated_at: String,
}

/// Aggregate scope 1/2/3 across documents. Totals reported by the documents
/// themselves are not used.
pub fn calculate_emissions(documents: &[EmissionsRecord]) -> RollupReport {
    let mut total = 0.0;
    let mut breakdown = ScopeBreakdown::default();

    for doc in documents {
        for scope in [Scope::Scope1, Scope::Scope2, Scope::Scope3] {
            let Some(value) = doc.get(scope).value() else { continue };
            total += value;
            let slot = match scope {
                Scope::Scope1 => &mut breakdown.scope_1,
                Scope::Scope2 => &mut breakdown.scope_2,
                _ => &mut breakdown.scope_3,
            };
            *slot = Some(value);
        }
    }

    debug!("Rolled up {} documents: {} {}", documents.len(), total, EMISSIONS_UNIT);

    RollupReport {
        total_emissions: round2(total),
        breakdown,
        unit: EMISSIONS_UNIT.to_string(),
        calculated_at: now_iso(),
    }
}
