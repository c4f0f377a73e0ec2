//! # Stock Math
//!
//! Statistical building blocks for demand forecasting.
//! This crate provides the descriptive statistics, line fitting, rolling
//! averages, outlier handling and parameter optimization that the
//! forecasting models are assembled from.

use thiserror::Error;

pub mod moving_averages;
pub mod optimization;
pub mod outliers;
pub mod regression;
pub mod stats;

pub use moving_averages::{rolling_mean, trailing_mean, SimpleMovingAverage};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use outliers::{detect_outliers, replace_outliers};
pub use regression::{trend_slope, LinearFit};

/// Errors that can occur in statistical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for statistical operations
pub type Result<T> = std::result::Result<T, MathError>;
