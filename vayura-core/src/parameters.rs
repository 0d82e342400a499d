//! Calculator parameters
//!
//! Every constant used by the oxygen demand calculation lives in
//! [`CalculatorParameters`]. The struct is injected into the calculator at
//! construction and is also the source of the human-readable assumption text,
//! so retuning a constant changes the formula and its documentation together.
//!
//! Parameters deserialise with `#[serde(default)]`, so a TOML file only needs to
//! list the values it overrides:
//!
//! ```toml
//! trees_per_hectare = 625.0
//! min_soil_yield_fraction = 0.7
//!
//! [disaster_curve]
//! trend = "increasing"
//! bands = [{ lower = 0.0, upper = 10.0, start = 1.05, end = 1.5 }]
//! ```

use crate::errors::{CalculatorError, CalculatorResult};
use crate::penalty::PenaltyCurve;
use crate::result::ConfidenceLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Parameters for the oxygen demand calculation
///
/// # Base demand
///
/// $$D_{base} = P \cdot V_{O_2} \cdot N_{days} \cdot \rho_{O_2} / 1000$$
///
/// where $P$ is the population, $V_{O_2}$ the daily per-person consumption and
/// $\rho_{O_2}$ the density of oxygen.
///
/// # Tree supply
///
/// $$S_{tree} = S_{base} \cdot \max\left(\frac{Q_{soil}}{100}, f_{min}\right)$$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorParameters {
    /// Oxygen consumed per person per day
    /// unit: L/day
    /// default: 550.0
    pub o2_consumption_l_per_day: f64,

    /// Oxygen density at STP, used for the volume to mass conversion
    /// unit: g/L
    /// default: 1.429
    pub o2_density_g_per_l: f64,

    /// unit: days
    /// default: 365.0
    pub days_per_year: f64,

    /// Nominal oxygen yield of a mature tree before soil adjustment
    /// unit: kg/year
    /// default: 110.0
    pub base_tree_o2_kg_per_year: f64,

    /// Mature tree lifespan. Only reported in the assumptions; not part of
    /// the deficit formula.
    /// unit: years
    /// default: 50.0
    pub tree_lifespan_years: f64,

    /// Planting density used to convert a tree count to land area.
    ///
    /// A typical plantation density; 6,762,345 trees ≈ 16,905.86 ha.
    /// unit: trees/hectare
    /// default: 400.0
    pub trees_per_hectare: f64,

    /// Floor applied to the soil yield fraction `soil_quality / 100`.
    ///
    /// With the default of 0.0 a soil quality of 0 gives zero per-tree
    /// supply and the calculation is refused. A positive floor clamps the
    /// supply instead, e.g. 0.7 keeps poor-soil trees at 70% yield.
    /// unit: dimensionless
    /// default: 0.0
    pub min_soil_yield_fraction: f64,

    /// Frequency score above which disaster inputs are outside the observed range.
    /// Advisory only; larger values are accepted.
    /// unit: events/year-equivalent
    /// default: 20.0
    pub advisory_max_disaster_frequency: f64,

    /// Label attached to every result
    /// default: high
    pub confidence_level: ConfidenceLevel,

    /// Citations reported with every result
    pub data_sources: Vec<String>,

    /// AQI penalty curve
    /// default: [`PenaltyCurve::epa_aqi`]
    pub aqi_curve: PenaltyCurve,

    /// Soil degradation penalty curve
    /// default: [`PenaltyCurve::soil_degradation`]
    pub soil_curve: PenaltyCurve,

    /// Disaster loss penalty curve
    /// default: [`PenaltyCurve::disaster_loss`]
    pub disaster_curve: PenaltyCurve,
}

impl Default for CalculatorParameters {
    fn default() -> Self {
        Self {
            o2_consumption_l_per_day: 550.0,
            o2_density_g_per_l: 1.429,
            days_per_year: 365.0,
            base_tree_o2_kg_per_year: 110.0,
            tree_lifespan_years: 50.0,
            trees_per_hectare: 400.0,
            min_soil_yield_fraction: 0.0,
            advisory_max_disaster_frequency: 20.0,
            confidence_level: ConfidenceLevel::High,
            data_sources: vec![
                "WHO: Human oxygen consumption standards".to_string(),
                "USDA Forest Service: Tree oxygen production research".to_string(),
                "EPA: Air Quality Index categories".to_string(),
            ],
            aqi_curve: PenaltyCurve::epa_aqi(),
            soil_curve: PenaltyCurve::soil_degradation(),
            disaster_curve: PenaltyCurve::disaster_loss(),
        }
    }
}

impl CalculatorParameters {
    /// Parse parameters from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(document: &str) -> CalculatorResult<Self> {
        let parameters: Self =
            toml::from_str(document).map_err(|e| CalculatorError::ParameterFile(e.to_string()))?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Read and parse a TOML parameters file.
    pub fn from_file(path: impl AsRef<Path>) -> CalculatorResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading calculator parameters");
        let document = std::fs::read_to_string(path)
            .map_err(|e| CalculatorError::ParameterFile(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&document)
    }

    /// Render the parameters as a TOML document.
    pub fn to_toml_string(&self) -> CalculatorResult<String> {
        toml::to_string(self).map_err(|e| CalculatorError::ParameterFile(e.to_string()))
    }

    /// Human-readable description of the constants in use.
    pub fn assumptions(&self) -> Vec<String> {
        vec![
            format!(
                "Average human O2 consumption: {} L/day",
                self.o2_consumption_l_per_day
            ),
            format!("Oxygen density at STP: {} g/L", self.o2_density_g_per_l),
            format!(
                "Mature tree O2 production: {} kg/year",
                self.base_tree_o2_kg_per_year
            ),
            format!("Mature tree lifespan: {} years", self.tree_lifespan_years),
            format!(
                "Tree plantation density: {} trees/hectare",
                self.trees_per_hectare
            ),
            "Calculations assume no existing tree coverage (conservative estimate)".to_string(),
            "O2 demand penalties based on AQI, soil quality, and disaster frequency".to_string(),
        ]
    }

    /// Check the internal consistency of the parameter set.
    pub fn validate(&self) -> CalculatorResult<()> {
        let positive = [
            ("o2_consumption_l_per_day", self.o2_consumption_l_per_day),
            ("o2_density_g_per_l", self.o2_density_g_per_l),
            ("days_per_year", self.days_per_year),
            ("base_tree_o2_kg_per_year", self.base_tree_o2_kg_per_year),
            ("tree_lifespan_years", self.tree_lifespan_years),
            ("trees_per_hectare", self.trees_per_hectare),
            (
                "advisory_max_disaster_frequency",
                self.advisory_max_disaster_frequency,
            ),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalculatorError::invalid_parameter(
                    name,
                    format!("must be a positive finite number, got {value}"),
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.min_soil_yield_fraction) {
            return Err(CalculatorError::invalid_parameter(
                "min_soil_yield_fraction",
                format!(
                    "must lie in [0, 1], got {}",
                    self.min_soil_yield_fraction
                ),
            ));
        }

        self.aqi_curve.validate("aqi_curve")?;
        self.soil_curve.validate("soil_curve")?;
        self.disaster_curve.validate("disaster_curve")?;

        if self.data_sources.is_empty() {
            warn!("No data sources configured; results will carry no citations");
        }

        Ok(())
    }
}
