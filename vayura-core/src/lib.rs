//! District oxygen demand and tree requirement calculator
//!
//! Estimates how much oxygen a district's population consumes per year,
//! inflates that demand by air quality, soil degradation and disaster
//! penalties, and converts the resulting deficit into the number of trees
//! (and hectares of planting) needed to offset it.
//!
//! # Module Organisation
//!
//! - `calculator`: the [`OxygenDemandCalculator`] pipeline
//! - `penalty`: table-driven penalty curves
//! - `parameters`: every constant, with defaults and TOML loading
//! - `request` / `result`: the input and output records
//!
//! ```
//! use vayura_core::{CalculationRequest, OxygenDemandCalculator};
//!
//! let calculator = OxygenDemandCalculator::new();
//! let request = CalculationRequest::new("Delhi", 12_765_000, 156.5, 65.0, 3.2);
//! let result = calculator.calculate(&request).unwrap();
//! assert!(result.trees_required > 0);
//! ```

pub mod calculator;
pub mod errors;
pub mod parameters;
pub mod penalty;
pub mod request;
pub mod result;

pub use calculator::OxygenDemandCalculator;
pub use errors::{CalculatorError, CalculatorResult};
pub use parameters::CalculatorParameters;
pub use request::CalculationRequest;
pub use result::{CalculationResult, ConfidenceLevel, FormulaBreakdown};
