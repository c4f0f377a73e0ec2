//! Linear trend model: least-squares line over the day index, extrapolated

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, PointForecast, TrainedForecastModel};
use stock_math::LinearFit;

const MODEL: &str = "linear regression";

/// Linear trend model
#[derive(Debug, Clone)]
pub struct LinearTrend {
    name: String,
}

/// Trained linear trend model
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    name: String,
    fit: LinearFit,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self {
            name: "Linear Regression".to_string(),
        }
    }
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, data: &TimeSeries) -> Result<Self::Trained> {
        let fit = LinearFit::fit(data.values())
            .map_err(|e| ForecastError::fitting(MODEL, e.to_string()))?;

        Ok(TrainedLinearTrend {
            name: self.name.clone(),
            fit,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinearTrend {
    pub fn fit(&self) -> &LinearFit {
        &self.fit
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: usize) -> Result<PointForecast> {
        PointForecast::new(self.fit.extrapolate(horizon), horizon)
            .map_err(|e| ForecastError::fitting(MODEL, e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
