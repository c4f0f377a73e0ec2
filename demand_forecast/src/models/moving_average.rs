//! Moving average model for demand forecasting

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, PointForecast, TrainedForecastModel};
use stock_math::moving_averages::trailing_mean;

/// Simple Moving Average model
#[derive(Debug, Clone)]
pub struct SimpleMA {
    /// Name of the model
    name: String,
    /// Window size
    window: usize,
}

/// Trained Simple Moving Average model
#[derive(Debug, Clone)]
pub struct TrainedSimpleMA {
    /// Name of the model
    name: String,
    /// Window actually averaged (shorter than requested on short series)
    effective_window: usize,
    /// Mean of the trailing window
    last_average: f64,
}

impl SimpleMA {
    /// Create a new Simple Moving Average model
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Simple Moving Average (window={})", window),
            window,
        })
    }
}

impl Default for SimpleMA {
    fn default() -> Self {
        Self {
            name: "Simple Moving Average (window=7)".to_string(),
            window: 7,
        }
    }
}

impl ForecastModel for SimpleMA {
    type Trained = TrainedSimpleMA;

    fn train(&self, data: &TimeSeries) -> Result<Self::Trained> {
        let values = data.values();
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        // Average over whatever is available when the series is shorter than the window
        let last_average = trailing_mean(values, self.window)?;

        Ok(TrainedSimpleMA {
            name: self.name.clone(),
            effective_window: self.window.min(values.len()),
            last_average,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSimpleMA {
    pub fn last_average(&self) -> f64 {
        self.last_average
    }

    pub fn effective_window(&self) -> usize {
        self.effective_window
    }
}

impl TrainedForecastModel for TrainedSimpleMA {
    fn forecast(&self, horizon: usize) -> Result<PointForecast> {
        // For simple MA, the forecast is constant at the last average
        PointForecast::new(vec![self.last_average; horizon], horizon)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
