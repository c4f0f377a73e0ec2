//! Forecasting models for daily demand series

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use std::fmt::Debug;

/// Point forecast produced by a trained model
#[derive(Debug, Clone, PartialEq)]
pub struct PointForecast {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizon: usize,
}

impl PointForecast {
    /// Create a new point forecast, rejecting non-finite values
    pub fn new(values: Vec<f64>, horizon: usize) -> Result<Self> {
        if values.len() != horizon {
            return Err(ForecastError::DataError(format!(
                "Values length ({}) doesn't match horizon ({})",
                values.len(),
                horizon
            )));
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(
                "Forecast contains non-finite values".to_string(),
            ));
        }

        Ok(Self { values, horizon })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Demand cannot be negative: clamp every value at zero
    pub fn clamp_non_negative(mut self) -> Self {
        self.values.iter_mut().for_each(|v| *v = v.max(0.0));
        self
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizon: usize) -> Result<PointForecast>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a demand series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a demand series
    fn train(&self, data: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
pub mod exponential_smoothing;
pub mod linear_regression;
pub mod moving_average;

pub use arima::Arima;
pub use exponential_smoothing::HoltWinters;
pub use linear_regression::LinearTrend;
pub use moving_average::SimpleMA;
