//! Derived scoring: utility-bill carbon footprint, weighted ESG score and
//! sector benchmarking.

use ghgscan_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Emission factors in kg CO₂ per unit of usage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionFactors {
    /// Per kWh.
    pub electricity: f64,
    /// Per litre.
    pub water: f64,
    /// Per litre.
    pub petrol: f64,
    /// Per litre.
    pub diesel: f64,
    /// Per kg.
    pub waste: f64,
}

/// India grid and fuel factors.
pub const INDIA_FACTORS: EmissionFactors = EmissionFactors {
    electricity: 0.82,
    water: 0.0003,
    petrol: 2.31,
    diesel: 2.68,
    waste: 0.5,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    Electricity,
    Water,
    Fuel,
    Waste,
}

/// One utility bill. Only the quantity matching `bill_type` is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityUsage {
    pub bill_type: BillType,
    #[serde(default)]
    pub energy_usage: Option<f64>,
    #[serde(default)]
    pub water_consumption: Option<f64>,
    #[serde(default)]
    pub fuel_consumption: Option<f64>,
    #[serde(default)]
    pub waste_generation: Option<f64>,
}

/// Carbon footprint of utility usage in tCO₂e. Fuel is assumed to be diesel.
pub fn carbon_footprint(usage: &[UtilityUsage], factors: &EmissionFactors) -> f64 {
    let kg: f64 = usage
        .iter()
        .map(|item| match item.bill_type {
            BillType::Electricity => item.energy_usage.unwrap_or(0.0) * factors.electricity,
            BillType::Water => item.water_consumption.unwrap_or(0.0) * factors.water,
            BillType::Fuel => item.fuel_consumption.unwrap_or(0.0) * factors.diesel,
            BillType::Waste => item.waste_generation.unwrap_or(0.0) * factors.waste,
        })
        .sum();
    kg / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsgMetrics {
    pub carbon_intensity: f64,
    pub energy_efficiency: f64,
    pub water_efficiency: f64,
    pub waste_reduction: f64,
}

const CARBON_WEIGHT: f64 = 0.4;
const ENERGY_WEIGHT: f64 = 0.25;
const WATER_WEIGHT: f64 = 0.2;
const WASTE_WEIGHT: f64 = 0.15;

/// Weighted ESG score, rounded to an integer.
pub fn esg_score(metrics: &EsgMetrics) -> i64 {
    let carbon = (100.0 - metrics.carbon_intensity * 10.0).max(0.0);
    let energy = (metrics.energy_efficiency * 20.0).min(100.0);
    let water = (metrics.water_efficiency * 15.0).min(100.0);
    let waste = (metrics.waste_reduction * 25.0).min(100.0);

    (carbon * CARBON_WEIGHT + energy * ENERGY_WEIGHT + water * WATER_WEIGHT + waste * WASTE_WEIGHT).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Better,
    Average,
    Worse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorBenchmark {
    pub percentile: i64,
    pub comparison: Comparison,
    pub message: String,
}

/// Place `value` against the sector median. Lower is better.
pub fn benchmark_against_sector(value: f64, sector_median: f64) -> Result<SectorBenchmark> {
    if !(sector_median > 0.0) || !value.is_finite() {
        return Err(Error::InvalidInput(format!(
            "sector median must be positive (got {}) and value finite (got {})",
            sector_median, value
        )));
    }

    let ratio = value / sector_median;
    let (percentile, comparison) = if ratio <= 0.8 {
        ((80.0 + (0.8 - ratio) * 50.0).min(100.0), Comparison::Better)
    } else if ratio <= 1.2 {
        (40.0 + (1.2 - ratio) * 100.0, Comparison::Average)
    } else {
        ((40.0 - (ratio - 1.2) * 50.0).max(5.0), Comparison::Worse)
    };

    let message = match comparison {
        Comparison::Better => format!("Better than {}% of peers", percentile.round()),
        Comparison::Average => format!("Close to sector median ({}th percentile)", percentile.round()),
        Comparison::Worse => format!("{}% higher than median", ((ratio - 1.0) * 100.0).round()),
    };

    Ok(SectorBenchmark {
        percentile: percentile.round() as i64,
        comparison,
        message,
    })
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkInput {
    pub value: f64,
    pub sector_median: f64,
}

/// Any combination of the three scores; absent inputs produce absent outputs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub usage: Vec<UtilityUsage>,
    #[serde(default)]
    pub metrics: Option<EsgMetrics>,
    #[serde(default)]
    pub benchmark: Option<BenchmarkInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esg_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<SectorBenchmark>,
    pub unit: &'static str,
}

pub fn score(request: &ScoreRequest) -> Result<ScoreResponse> {
    if request.usage.is_empty() && request.metrics.is_none() && request.benchmark.is_none() {
        return Err(Error::InvalidInput("expected usage, metrics or benchmark".into()));
    }

    let benchmark = request
        .benchmark
        .map(|b| benchmark_against_sector(b.value, b.sector_median))
        .transpose()?;

    Ok(ScoreResponse {
        carbon_footprint: (!request.usage.is_empty()).then(|| carbon_footprint(&request.usage, &INDIA_FACTORS)),
        esg_score: request.metrics.as_ref().map(esg_score),
        benchmark,
        unit: crate::types::EMISSIONS_UNIT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(bill_type: BillType, amount: f64) -> UtilityUsage {
        let mut usage = UtilityUsage {
            bill_type,
            energy_usage: None,
            water_consumption: None,
            fuel_consumption: None,
            waste_generation: None,
        };
        let slot = match bill_type {
            BillType::Electricity => &mut usage.energy_usage,
            BillType::Water => &mut usage.water_consumption,
            BillType::Fuel => &mut usage.fuel_consumption,
            BillType::Waste => &mut usage.waste_generation,
        };
        *slot = Some(amount);
        usage
    }

    #[test]
    fn test_carbon_footprint() {
        let usage = [
            bill(BillType::Electricity, 1000.0),
            bill(BillType::Fuel, 100.0),
            bill(BillType::Waste, 200.0),
            bill(BillType::Water, 10_000.0),
        ];
        // 820 + 268 + 100 + 3 kg
        let tonnes = carbon_footprint(&usage, &INDIA_FACTORS);
        assert!((tonnes - 1.191).abs() < 1e-9);
    }

    #[test]
    fn test_footprint_ignores_mismatched_quantity() {
        let mut usage = bill(BillType::Water, 0.0);
        usage.energy_usage = Some(5000.0);
        assert_eq!(carbon_footprint(&[usage], &INDIA_FACTORS), 0.0);
    }

    #[test]
    fn test_esg_score() {
        let metrics = EsgMetrics {
            carbon_intensity: 2.0,
            energy_efficiency: 3.0,
            water_efficiency: 4.0,
            waste_reduction: 2.0,
        };
        // 80*0.4 + 60*0.25 + 60*0.2 + 50*0.15 = 66.5
        assert_eq!(esg_score(&metrics), 67);

        let capped = EsgMetrics {
            carbon_intensity: 50.0,
            energy_efficiency: 100.0,
            water_efficiency: 100.0,
            waste_reduction: 100.0,
        };
        assert_eq!(esg_score(&capped), 60);
    }

    #[test]
    fn test_benchmark_bands() {
        let better = benchmark_against_sector(60.0, 100.0).unwrap();
        assert_eq!(better.comparison, Comparison::Better);
        assert_eq!(better.percentile, 90);
        assert_eq!(better.message, "Better than 90% of peers");

        let average = benchmark_against_sector(100.0, 100.0).unwrap();
        assert_eq!(average.comparison, Comparison::Average);
        assert_eq!(average.percentile, 60);
        assert_eq!(average.message, "Close to sector median (60th percentile)");

        let worse = benchmark_against_sector(150.0, 100.0).unwrap();
        assert_eq!(worse.comparison, Comparison::Worse);
        assert_eq!(worse.percentile, 25);
        assert_eq!(worse.message, "50% higher than median");

        let far_worse = benchmark_against_sector(1000.0, 100.0).unwrap();
        assert_eq!(far_worse.percentile, 5);
    }

    #[test]
    fn test_benchmark_rejects_bad_median() {
        assert!(matches!(benchmark_against_sector(10.0, 0.0), Err(Error::InvalidInput(_))));
        assert!(matches!(benchmark_against_sector(10.0, -5.0), Err(Error::InvalidInput(_))));
        assert!(matches!(benchmark_against_sector(10.0, f64::NAN), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_score_request() {
        let request: ScoreRequest = serde_json::from_value(serde_json::json!({
            "usage": [{"billType": "electricity", "energyUsage": 1000.0}],
            "benchmark": {"value": 60.0, "sectorMedian": 100.0}
        }))
        .unwrap();
        let response = score(&request).unwrap();
        assert!((response.carbon_footprint.unwrap() - 0.82).abs() < 1e-9);
        assert!(response.esg_score.is_none());
        assert_eq!(response.benchmark.unwrap().comparison, Comparison::Better);

        assert!(score(&ScoreRequest::default()).is_err());
    }
}
