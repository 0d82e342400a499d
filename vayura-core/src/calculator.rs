//! Oxygen Demand Calculator
//!
//! Estimates the annual oxygen consumed by a district's population, inflates it
//! by environmental penalty factors and converts the resulting deficit into a
//! count of trees.
//!
//! # What This Calculator Does
//!
//! 1. Base human oxygen demand from population:
//!    $$D_{base} = P \cdot V_{O_2} \cdot N_{days} \cdot \rho_{O_2} / 1000$$
//!
//! 2. Three independent penalty factors from AQI, soil quality and disaster
//!    frequency (see [`crate::penalty`]).
//!
//! 3. Adjusted demand, which is also the oxygen deficit since no existing tree
//!    supply is netted out:
//!    $$D_{adj} = D_{base} \cdot f_{aqi} \cdot f_{soil} \cdot f_{disaster}$$
//!
//! 4. Soil-adjusted supply of one mature tree:
//!    $$S_{tree} = S_{base} \cdot \max(Q_{soil} / 100, f_{min})$$
//!
//! 5. Trees required and the land they occupy:
//!    $$N = \lceil D_{adj} / S_{tree} \rceil, \quad A = N / \rho_{planting}$$
//!
//! # Inputs
//!
//! - [`CalculationRequest`]: district name, population, AQI, soil quality and
//!   disaster frequency
//!
//! # Outputs
//!
//! - [`CalculationResult`]: headline figures plus the full [`FormulaBreakdown`],
//!   the assumptions and the data sources
//!
//! The calculator holds no mutable state and performs no I/O, so a single
//! instance can be shared across threads.

use crate::errors::{CalculatorError, CalculatorResult};
use crate::parameters::CalculatorParameters;
use crate::request::{CalculationRequest, SOIL_QUALITY_MAX};
use crate::result::{CalculationResult, FormulaBreakdown};
use serde::{Deserialize, Serialize};

/// Stateless oxygen demand calculator
///
/// Serialises as its parameters. Deserialising goes through
/// [`OxygenDemandCalculator::from_parameters`], so invalid parameters are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CalculatorParameters", into = "CalculatorParameters")]
pub struct OxygenDemandCalculator {
    parameters: CalculatorParameters,
}

impl OxygenDemandCalculator {
    /// Create a new calculator with default parameters
    pub fn new() -> Self {
        Self {
            parameters: CalculatorParameters::default(),
        }
    }

    /// Create a new calculator from parameters
    ///
    /// Fails if the parameters are internally inconsistent.
    pub fn from_parameters(parameters: CalculatorParameters) -> CalculatorResult<Self> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &CalculatorParameters {
        &self.parameters
    }

    /// Annual oxygen volume consumed by `population` people
    ///
    /// unit: L/year
    pub fn human_o2_demand_liters(&self, population: u64) -> f64 {
        population as f64
            * self.parameters.o2_consumption_l_per_day
            * self.parameters.days_per_year
    }

    /// Annual oxygen mass consumed by `population` people
    ///
    /// unit: kg/year
    pub fn human_o2_demand_kg(&self, population: u64) -> f64 {
        self.human_o2_demand_liters(population) * self.parameters.o2_density_g_per_l / 1000.0
    }

    pub fn aqi_penalty_factor(&self, aqi: f64) -> f64 {
        self.parameters.aqi_curve.factor(aqi)
    }

    pub fn soil_degradation_factor(&self, soil_quality: f64) -> f64 {
        self.parameters.soil_curve.factor(soil_quality)
    }

    pub fn disaster_loss_factor(&self, disaster_frequency: f64) -> f64 {
        self.parameters.disaster_curve.factor(disaster_frequency)
    }

    /// Oxygen produced by one mature tree growing in soil of the given quality
    ///
    /// unit: kg/year
    pub fn soil_adjusted_tree_supply_kg(&self, soil_quality: f64) -> f64 {
        let yield_fraction =
            (soil_quality / SOIL_QUALITY_MAX).max(self.parameters.min_soil_yield_fraction);
        self.parameters.base_tree_o2_kg_per_year * yield_fraction
    }

    /// Run the full calculation for one district.
    ///
    /// The request is validated before anything is computed. Fails with
    /// [`CalculatorError::ZeroTreeSupply`] when the soil-adjusted tree supply
    /// is zero, i.e. `soil_quality == 0` with no yield floor configured, and
    /// with [`CalculatorError::TreeCountOverflow`] when the tree count does not
    /// fit in a `u64` (vanishing soil quality or an implausible population).
    pub fn calculate(&self, request: &CalculationRequest) -> CalculatorResult<CalculationResult> {
        request.validate()?;
        let parameters = &self.parameters;

        let human_o2_demand_liters = self.human_o2_demand_liters(request.population);
        let human_o2_demand_kg = self.human_o2_demand_kg(request.population);

        let aqi_factor = self.aqi_penalty_factor(request.aqi);
        let soil_factor = self.soil_degradation_factor(request.soil_quality);
        let disaster_factor = self.disaster_loss_factor(request.disaster_frequency);
        let total_penalty = aqi_factor * soil_factor * disaster_factor;

        let adjusted_o2_demand_kg =
            human_o2_demand_kg * aqi_factor * soil_factor * disaster_factor;
        let oxygen_deficit_kg = adjusted_o2_demand_kg;

        let tree_supply_kg = self.soil_adjusted_tree_supply_kg(request.soil_quality);
        if tree_supply_kg <= 0.0 {
            return Err(CalculatorError::ZeroTreeSupply {
                soil_quality: request.soil_quality,
            });
        }

        let trees = (oxygen_deficit_kg / tree_supply_kg).ceil();
        if !trees.is_finite() || trees >= u64::MAX as f64 {
            // Blame population if even full-yield trees could not cover the deficit
            let field = if oxygen_deficit_kg / parameters.base_tree_o2_kg_per_year
                >= u64::MAX as f64
            {
                "population"
            } else {
                "soil_quality"
            };
            return Err(CalculatorError::TreeCountOverflow { field, trees });
        }
        let trees_required = trees as u64;
        let trees_required_hectares =
            round_to_hundredths(trees_required as f64 / parameters.trees_per_hectare);

        Ok(CalculationResult {
            district_name: request.district_name.clone(),
            population: request.population,
            human_o2_demand_kg_per_year: human_o2_demand_kg,
            penalty_adjusted_demand_kg_per_year: adjusted_o2_demand_kg,
            per_tree_o2_supply_kg_per_year: tree_supply_kg,
            oxygen_deficit_kg_per_year: oxygen_deficit_kg,
            trees_required,
            trees_required_hectares,
            formula_breakdown: FormulaBreakdown {
                human_o2_demand_liters,
                human_o2_demand_kg,
                aqi_penalty_factor: aqi_factor,
                soil_degradation_factor: soil_factor,
                disaster_loss_factor: disaster_factor,
                total_penalty,
                adjusted_o2_demand_kg,
                per_tree_o2_supply_kg: parameters.base_tree_o2_kg_per_year,
                soil_adjusted_tree_supply_kg: tree_supply_kg,
            },
            assumptions: parameters.assumptions(),
            confidence_level: parameters.confidence_level,
            data_sources: parameters.data_sources.clone(),
        })
    }
}

impl TryFrom<CalculatorParameters> for OxygenDemandCalculator {
    type Error = CalculatorError;

    fn try_from(parameters: CalculatorParameters) -> CalculatorResult<Self> {
        Self::from_parameters(parameters)
    }
}

impl From<OxygenDemandCalculator> for CalculatorParameters {
    fn from(calculator: OxygenDemandCalculator) -> Self {
        calculator.parameters
    }
}

impl Default for OxygenDemandCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ConfidenceLevel;
    use is_close::is_close;

    fn default_calculator() -> OxygenDemandCalculator {
        OxygenDemandCalculator::from_parameters(CalculatorParameters::default()).unwrap()
    }

    // ===== Base Demand Tests =====

    #[test]
    fn test_single_person_demand() {
        let calculator = default_calculator();
        // 550 L/day * 365 days = 200,750 L; * 1.429 g/L = 286,871.75 g
        assert!(is_close!(calculator.human_o2_demand_liters(1), 200_750.0));
        assert!(is_close!(calculator.human_o2_demand_kg(1), 286.87175));
    }

    #[test]
    fn test_demand_scales_with_population() {
        let calculator = default_calculator();
        let one = calculator.human_o2_demand_kg(1);
        let thousand = calculator.human_o2_demand_kg(1000);
        assert!(is_close!(thousand, one * 1000.0));
    }

    // ===== Tree Supply Tests =====

    #[test]
    fn test_tree_supply_scales_with_soil() {
        let calculator = default_calculator();
        assert!(is_close!(calculator.soil_adjusted_tree_supply_kg(100.0), 110.0));
        assert!(is_close!(calculator.soil_adjusted_tree_supply_kg(65.0), 71.5));
        assert_eq!(calculator.soil_adjusted_tree_supply_kg(0.0), 0.0);
    }

    #[test]
    fn test_tree_supply_floor() {
        let calculator = OxygenDemandCalculator::from_parameters(CalculatorParameters {
            min_soil_yield_fraction: 0.7,
            ..Default::default()
        })
        .unwrap();
        assert!(is_close!(calculator.soil_adjusted_tree_supply_kg(0.0), 77.0));
        assert!(is_close!(calculator.soil_adjusted_tree_supply_kg(50.0), 77.0));
        assert!(is_close!(calculator.soil_adjusted_tree_supply_kg(90.0), 99.0));
    }

    // ===== Full Calculation Tests =====

    #[test]
    fn test_small_district() {
        let calculator = default_calculator();
        let request = CalculationRequest::new("Clean Valley", 1_234, 0.0, 100.0, 0.0);
        let result = calculator.calculate(&request).unwrap();

        // 1,234 * 286.87175 kg = 353,999.7395 kg; * 1.0 * 1.0 * 1.05 = 371,699.726475 kg
        assert!(is_close!(result.human_o2_demand_kg_per_year, 353_999.7395));
        assert!(is_close!(
            result.penalty_adjusted_demand_kg_per_year,
            371_699.726475
        ));
        // 371,699.726475 / 110 = 3379.09 -> 3380 trees -> 8.45 ha
        assert_eq!(result.trees_required, 3380);
        assert_eq!(result.trees_required_hectares, 8.45);
    }

    #[test]
    fn test_deficit_equals_adjusted_demand() {
        let calculator = default_calculator();
        let request = CalculationRequest::new("Nagpur", 4_653_570, 142.0, 48.0, 4.1);
        let result = calculator.calculate(&request).unwrap();
        assert_eq!(
            result.oxygen_deficit_kg_per_year,
            result.penalty_adjusted_demand_kg_per_year
        );
        assert_eq!(
            result.formula_breakdown.adjusted_o2_demand_kg,
            result.penalty_adjusted_demand_kg_per_year
        );
    }

    #[test]
    fn test_breakdown_reports_base_and_adjusted_supply() {
        let calculator = default_calculator();
        let request = CalculationRequest::new("Ranchi", 2_914_253, 88.0, 40.0, 6.0);
        let result = calculator.calculate(&request).unwrap();
        assert_eq!(result.formula_breakdown.per_tree_o2_supply_kg, 110.0);
        assert!(is_close!(
            result.formula_breakdown.soil_adjusted_tree_supply_kg,
            44.0
        ));
        assert_eq!(
            result.per_tree_o2_supply_kg_per_year,
            result.formula_breakdown.soil_adjusted_tree_supply_kg
        );
        assert!(is_close!(
            result.formula_breakdown.total_penalty,
            result.formula_breakdown.aqi_penalty_factor
                * result.formula_breakdown.soil_degradation_factor
                * result.formula_breakdown.disaster_loss_factor
        ));
    }

    #[test]
    fn test_metadata_comes_from_parameters() {
        let parameters = CalculatorParameters {
            confidence_level: ConfidenceLevel::Medium,
            data_sources: vec!["Census 2011".to_string()],
            ..Default::default()
        };
        let calculator = OxygenDemandCalculator::from_parameters(parameters.clone()).unwrap();
        let result = calculator
            .calculate(&CalculationRequest::new("Leh", 133_487, 35.0, 30.0, 1.0))
            .unwrap();
        assert_eq!(result.confidence_level, ConfidenceLevel::Medium);
        assert_eq!(result.data_sources, vec!["Census 2011".to_string()]);
        assert_eq!(result.assumptions, parameters.assumptions());
        assert_eq!(result.district_name, "Leh");
        assert_eq!(result.population, 133_487);
    }

    // ===== Error Tests =====

    #[test]
    fn test_zero_soil_is_refused() {
        let calculator = default_calculator();
        let request = CalculationRequest::new("Barren", 10_000, 50.0, 0.0, 1.0);
        let err = calculator.calculate(&request).unwrap_err();
        assert!(matches!(err, CalculatorError::ZeroTreeSupply { .. }));
        assert_eq!(err.field(), Some("soil_quality"));
    }

    #[test]
    fn test_zero_soil_with_floor_is_clamped() {
        let calculator = OxygenDemandCalculator::from_parameters(CalculatorParameters {
            min_soil_yield_fraction: 0.7,
            ..Default::default()
        })
        .unwrap();
        let request = CalculationRequest::new("Barren", 10_000, 50.0, 0.0, 1.0);
        let result = calculator.calculate(&request).unwrap();
        assert!(is_close!(result.per_tree_o2_supply_kg_per_year, 77.0));
        assert!(result.trees_required > 0);
    }

    #[test]
    fn test_invalid_request_is_rejected_before_computation() {
        let calculator = default_calculator();
        let request = CalculationRequest::new("Nowhere", 0, 50.0, 0.0, 1.0);
        // population is checked before the zero-supply guard
        let err = calculator.calculate(&request).unwrap_err();
        assert_eq!(err.field(), Some("population"));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let result = OxygenDemandCalculator::from_parameters(CalculatorParameters {
            base_tree_o2_kg_per_year: -1.0,
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(CalculatorError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_deserialise_validates_parameters() {
        let calculator: OxygenDemandCalculator = serde_json::from_str("{}").unwrap();
        assert_eq!(calculator, OxygenDemandCalculator::new());

        let err = serde_json::from_str::<OxygenDemandCalculator>(r#"{"trees_per_hectare": 0.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("trees_per_hectare"));
    }

    #[test]
    fn test_serialises_as_parameters() {
        let calculator = OxygenDemandCalculator::new();
        let value = serde_json::to_value(&calculator).unwrap();
        assert_eq!(value["trees_per_hectare"], 400.0);
        let roundtrip: OxygenDemandCalculator = serde_json::from_value(value).unwrap();
        assert_eq!(roundtrip, calculator);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_hundredths(16_905.8625), 16_905.86);
        assert_eq!(round_to_hundredths(0.005), 0.01);
        assert_eq!(round_to_hundredths(2.0), 2.0);
    }
}
