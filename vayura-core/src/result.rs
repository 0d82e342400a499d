//! Calculation output

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reliability label attached to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        };
        f.write_str(label)
    }
}

/// Every intermediate value of a calculation
///
/// The breakdown recombines to the headline figures:
///
/// - `adjusted_o2_demand_kg = human_o2_demand_kg * aqi_penalty_factor * soil_degradation_factor * disaster_loss_factor`
/// - `trees_required = ceil(adjusted_o2_demand_kg / soil_adjusted_tree_supply_kg)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaBreakdown {
    /// unit: L/year
    pub human_o2_demand_liters: f64,
    /// unit: kg/year
    pub human_o2_demand_kg: f64,
    pub aqi_penalty_factor: f64,
    pub soil_degradation_factor: f64,
    pub disaster_loss_factor: f64,
    /// Product of the three penalty factors
    pub total_penalty: f64,
    /// unit: kg/year
    pub adjusted_o2_demand_kg: f64,
    /// Base yield of a mature tree before soil adjustment
    /// unit: kg/year
    pub per_tree_o2_supply_kg: f64,
    /// unit: kg/year
    pub soil_adjusted_tree_supply_kg: f64,
}

/// Oxygen demand and tree requirement for one district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub district_name: String,
    pub population: u64,

    pub human_o2_demand_kg_per_year: f64,
    pub penalty_adjusted_demand_kg_per_year: f64,

    pub per_tree_o2_supply_kg_per_year: f64,

    /// Same as `penalty_adjusted_demand_kg_per_year`; no existing tree cover is netted out.
    pub oxygen_deficit_kg_per_year: f64,

    pub trees_required: u64,
    /// Land area for `trees_required`, rounded to 2 decimal places
    pub trees_required_hectares: f64,

    pub formula_breakdown: FormulaBreakdown,
    pub assumptions: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    pub data_sources: Vec<String>,
}
