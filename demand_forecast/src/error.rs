//! Error types for the demand_forecast crate

use stock_math::MathError;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A statistical model could not be fitted to the series
    #[error("{model} fitting failed: {reason}")]
    ModelFitting { model: &'static str, reason: String },

    /// The requested product does not exist
    #[error("Product not found: {product_id}")]
    NotFound { product_id: u64 },

    /// The sales data source failed to answer a query
    #[error("Data source failure: {0}")]
    Upstream(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from configuration loading
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ForecastError {
    /// Build a fitting failure for the named model
    pub fn fitting(model: &'static str, reason: impl Into<String>) -> Self {
        ForecastError::ModelFitting {
            model,
            reason: reason.into(),
        }
    }

    /// Whether this error means the product does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ForecastError::NotFound { .. })
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
