//! Calculation input

use crate::errors::{CalculatorError, CalculatorResult};
use serde::{Deserialize, Serialize};

/// Highest AQI on the EPA scale
pub const AQI_MAX: f64 = 500.0;
/// Highest soil quality index
pub const SOIL_QUALITY_MAX: f64 = 100.0;

/// Environmental profile of a single district
///
/// Produced by the caller from whatever upstream data it holds. The
/// calculator only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub district_name: String,
    /// District population
    pub population: u64,
    /// Air Quality Index, 0-500
    pub aqi: f64,
    /// Soil quality index, 0-100 (higher is better)
    pub soil_quality: f64,
    /// Disaster frequency score, 0 and up (typically 0-20)
    pub disaster_frequency: f64,
}

impl CalculationRequest {
    pub fn new(
        district_name: impl Into<String>,
        population: u64,
        aqi: f64,
        soil_quality: f64,
        disaster_frequency: f64,
    ) -> Self {
        Self {
            district_name: district_name.into(),
            population,
            aqi,
            soil_quality,
            disaster_frequency,
        }
    }

    /// Check every field against its documented range.
    ///
    /// The first offending field is reported. The upper bound on
    /// `disaster_frequency` is advisory and is not enforced here.
    pub fn validate(&self) -> CalculatorResult<()> {
        if self.district_name.trim().is_empty() {
            return Err(CalculatorError::validation(
                "district_name",
                "must not be empty",
            ));
        }
        if self.population == 0 {
            return Err(CalculatorError::validation(
                "population",
                "must be greater than 0",
            ));
        }
        check_range("aqi", self.aqi, 0.0, Some(AQI_MAX))?;
        check_range("soil_quality", self.soil_quality, 0.0, Some(SOIL_QUALITY_MAX))?;
        check_range("disaster_frequency", self.disaster_frequency, 0.0, None)?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: Option<f64>,
) -> CalculatorResult<()> {
    if !value.is_finite() {
        return Err(CalculatorError::validation(
            field,
            format!("must be a finite number, got {value}"),
        ));
    }
    match max {
        Some(max) if !(min..=max).contains(&value) => Err(CalculatorError::validation(
            field,
            format!("{value} is out of bounds [{min}, {max}]"),
        )),
        None if value < min => Err(CalculatorError::validation(
            field,
            format!("{value} must be at least {min}"),
        )),
        _ => Ok(()),
    }
}
