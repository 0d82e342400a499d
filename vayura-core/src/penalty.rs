//! Penalty curves
//!
//! A penalty factor is a multiplier $\geq 1$ applied to the base oxygen demand to
//! represent a degraded environmental condition. Each factor is described by a
//! small data table rather than branching logic: an ordered list of contiguous
//! bands, each carrying the factor at its lower and upper bound.
//!
//! $$f(x) = f_{start} + (f_{end} - f_{start}) \cdot \frac{x - x_{lower}}{x_{upper} - x_{lower}}$$
//!
//! for the band containing $x$. A band with $f_{start} = f_{end}$ is a flat step,
//! so EPA-style categories and continuous ramps share the same representation.
//!
//! # Boundaries
//!
//! Bands are upper-inclusive: a value sitting exactly on a shared boundary is
//! evaluated in the lower band. Values below the first band take the first
//! band's start factor and values above the last band take its end factor.

use crate::errors::{CalculatorError, CalculatorResult};
use serde::{Deserialize, Serialize};

/// Direction in which a curve's factor moves as its input grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Larger inputs never give a smaller factor (AQI, disaster frequency).
    Increasing,
    /// Larger inputs never give a larger factor (soil quality).
    Decreasing,
}

/// One segment of a penalty curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyBand {
    /// Lower bound of the band (exclusive, except for the first band)
    pub lower: f64,
    /// Upper bound of the band (inclusive)
    pub upper: f64,
    /// Factor at `lower`
    pub start: f64,
    /// Factor at `upper`
    pub end: f64,
}

impl PenaltyBand {
    /// A band with a constant factor.
    pub const fn step(lower: f64, upper: f64, factor: f64) -> Self {
        Self {
            lower,
            upper,
            start: factor,
            end: factor,
        }
    }

    /// A band interpolating linearly from `start` to `end`.
    pub const fn linear(lower: f64, upper: f64, start: f64, end: f64) -> Self {
        Self {
            lower,
            upper,
            start,
            end,
        }
    }

    fn interpolate(&self, value: f64) -> f64 {
        let width = self.upper - self.lower;
        if width <= 0.0 || self.start == self.end {
            return self.start;
        }
        let fraction = ((value - self.lower) / width).clamp(0.0, 1.0);
        self.start + (self.end - self.start) * fraction
    }
}

/// Piecewise mapping from an environmental index to a penalty factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyCurve {
    pub trend: Trend,
    pub bands: Vec<PenaltyBand>,
}

impl PenaltyCurve {
    pub fn new(trend: Trend, bands: Vec<PenaltyBand>) -> Self {
        Self { trend, bands }
    }

    /// AQI penalty banded by EPA category.
    ///
    /// | AQI       | Category                       | Factor |
    /// |-----------|--------------------------------|--------|
    /// | 0-50      | Good                           | 1.00   |
    /// | 51-100    | Moderate                       | 1.05   |
    /// | 101-150   | Unhealthy for sensitive groups | 1.15   |
    /// | 151-200   | Unhealthy                      | 1.30   |
    /// | 201-300   | Very unhealthy                 | 1.50   |
    /// | 301-500   | Hazardous                      | 1.75   |
    pub fn epa_aqi() -> Self {
        Self::new(
            Trend::Increasing,
            vec![
                PenaltyBand::step(0.0, 50.0, 1.0),
                PenaltyBand::step(50.0, 100.0, 1.05),
                PenaltyBand::step(100.0, 150.0, 1.15),
                PenaltyBand::step(150.0, 200.0, 1.30),
                PenaltyBand::step(200.0, 300.0, 1.50),
                PenaltyBand::step(300.0, 500.0, 1.75),
            ],
        )
    }

    /// Soil degradation penalty, linear from 1.6 at soil quality 0 to 1.0 at 100.
    pub fn soil_degradation() -> Self {
        Self::new(
            Trend::Decreasing,
            vec![PenaltyBand::linear(0.0, 100.0, 1.6, 1.0)],
        )
    }

    /// Disaster loss penalty.
    ///
    /// Flat 1.05 floor up to a frequency score of 2, then ramps through the
    /// moderate (1.15 at 5) and high (1.30 at 8) categories to 1.50 at 10.
    /// Disasters are never assumed fully absent, so a frequency of 0 still
    /// carries the 1.05 floor.
    pub fn disaster_loss() -> Self {
        Self::new(
            Trend::Increasing,
            vec![
                PenaltyBand::step(0.0, 2.0, 1.05),
                PenaltyBand::linear(2.0, 5.0, 1.05, 1.15),
                PenaltyBand::linear(5.0, 8.0, 1.15, 1.30),
                PenaltyBand::linear(8.0, 10.0, 1.30, 1.50),
            ],
        )
    }

    /// Evaluate the factor for `value`.
    pub fn factor(&self, value: f64) -> f64 {
        let (Some(first), Some(last)) = (self.bands.first(), self.bands.last()) else {
            return 1.0;
        };
        if value <= first.lower {
            return first.start;
        }
        self.bands
            .iter()
            .find(|band| value <= band.upper)
            .map(|band| band.interpolate(value))
            .unwrap_or(last.end)
    }

    /// Smallest and largest factor the curve can produce.
    pub fn bounds(&self) -> (f64, f64) {
        self.bands
            .iter()
            .flat_map(|band| [band.start, band.end])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), f| {
                (lo.min(f), hi.max(f))
            })
    }

    /// Check that the table is non-empty, contiguous, never below 1.0 and
    /// monotonic in its declared trend.
    pub fn validate(&self, name: &str) -> CalculatorResult<()> {
        if self.bands.is_empty() {
            return Err(CalculatorError::invalid_parameter(
                name,
                "penalty curve has no bands",
            ));
        }

        let ordered = |a: f64, b: f64| match self.trend {
            Trend::Increasing => a <= b,
            Trend::Decreasing => a >= b,
        };

        for (i, band) in self.bands.iter().enumerate() {
            let values = [band.lower, band.upper, band.start, band.end];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(CalculatorError::invalid_parameter(
                    format!("{name}.bands[{i}]"),
                    "band values must be finite",
                ));
            }
            if band.lower >= band.upper {
                return Err(CalculatorError::invalid_parameter(
                    format!("{name}.bands[{i}]"),
                    format!("lower ({}) must be below upper ({})", band.lower, band.upper),
                ));
            }
            if band.start < 1.0 || band.end < 1.0 {
                return Err(CalculatorError::invalid_parameter(
                    format!("{name}.bands[{i}]"),
                    "penalty factors must be >= 1.0",
                ));
            }
            if !ordered(band.start, band.end) {
                return Err(CalculatorError::invalid_parameter(
                    format!("{name}.bands[{i}]"),
                    format!("factor is not {:?} within the band", self.trend),
                ));
            }
        }

        for (i, pair) in self.bands.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.upper != next.lower {
                return Err(CalculatorError::invalid_parameter(
                    format!("{name}.bands[{}]", i + 1),
                    format!(
                        "band starts at {} but the previous band ends at {}",
                        next.lower, prev.upper
                    ),
                ));
            }
            if !ordered(prev.end, next.start) {
                return Err(CalculatorError::invalid_parameter(
                    format!("{name}.bands[{}]", i + 1),
                    format!("factor is not {:?} across the band boundary", self.trend),
                ));
            }
        }

        Ok(())
    }
}
