//! Holt-Winters exponential smoothing with additive trend and seasonality
//!
//! Model equations for season length `m`:
//! - Level: `l_t = α(y_t - s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
//! - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
//! - Seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}`
//! - Forecast: `ŷ_{t+h} = l_t + h·b_t + s_{t+h-m}`
//!
//! The smoothing weights are estimated by minimising the in-sample sum of
//! squared one-step errors.

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, PointForecast, TrainedForecastModel};
use stock_math::optimization::{nelder_mead, NelderMeadConfig};
use tracing::debug;

const MODEL: &str = "exponential smoothing";
const WEIGHT_BOUNDS: (f64, f64) = (0.0001, 0.9999);

/// Additive Holt-Winters model
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Name of the model
    name: String,
    /// Season length in observations
    period: usize,
}

/// Trained Holt-Winters model holding the final smoothing state
#[derive(Debug, Clone)]
pub struct TrainedHoltWinters {
    name: String,
    period: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
    level: f64,
    trend: f64,
    /// Seasonal components indexed by absolute position modulo `period`
    seasonals: Vec<f64>,
    /// Length of the training series
    n: usize,
}

/// Smoothing state after a pass over the data
struct FilterState {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    sse: f64,
}

impl HoltWinters {
    /// Create a new Holt-Winters model with the given season length
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt-Winters (additive, period={})", period),
            period,
        })
    }

    /// Initial level, trend and seasonal components from the first two seasons
    fn initial_state(values: &[f64], period: usize) -> (f64, f64, Vec<f64>) {
        let first_season = &values[..period];
        let level = first_season.iter().sum::<f64>() / period as f64;

        // Average per-step change between matching points of the first two seasons
        let trend = (0..period)
            .map(|i| (values[period + i] - values[i]) / period as f64)
            .sum::<f64>()
            / period as f64;

        let mut seasonals: Vec<f64> = first_season.iter().map(|y| y - level).collect();
        let offset = seasonals.iter().sum::<f64>() / period as f64;
        seasonals.iter_mut().for_each(|s| *s -= offset);

        (level, trend, seasonals)
    }

    /// Run the smoothing recursions over `values` with fixed weights
    fn filter(values: &[f64], period: usize, alpha: f64, beta: f64, gamma: f64) -> FilterState {
        let (mut level, mut trend, mut seasonals) = Self::initial_state(values, period);
        let mut sse = 0.0;

        for (t, &y) in values.iter().enumerate().skip(period) {
            let idx = t % period;
            let s = seasonals[idx];

            let error = y - (level + trend + s);
            sse += error * error;

            let previous_level = level;
            level = alpha * (y - s) + (1.0 - alpha) * (previous_level + trend);
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
            seasonals[idx] = gamma * (y - level) + (1.0 - gamma) * s;
        }

        FilterState {
            level,
            trend,
            seasonals,
            sse,
        }
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self {
            name: "Holt-Winters (additive, period=7)".to_string(),
            period: 7,
        }
    }
}

impl ForecastModel for HoltWinters {
    type Trained = TrainedHoltWinters;

    fn train(&self, data: &TimeSeries) -> Result<Self::Trained> {
        let values = data.values();
        let period = self.period;
        if values.len() < 2 * period {
            return Err(ForecastError::fitting(
                MODEL,
                format!(
                    "need at least {} observations for period {}, got {}",
                    2 * period,
                    period,
                    values.len()
                ),
            ));
        }

        let optimum = nelder_mead(
            |w| Self::filter(values, period, w[0], w[1], w[2]).sse,
            &[0.3, 0.1, 0.1],
            &[WEIGHT_BOUNDS; 3],
            NelderMeadConfig::default(),
        )
        .map_err(|e| ForecastError::fitting(MODEL, e.to_string()))?;

        let (alpha, beta, gamma) = (optimum.point[0], optimum.point[1], optimum.point[2]);
        let state = Self::filter(values, period, alpha, beta, gamma);

        let finite = state.level.is_finite()
            && state.trend.is_finite()
            && state.seasonals.iter().all(|s| s.is_finite());
        if !finite {
            return Err(ForecastError::fitting(MODEL, "smoothing state diverged"));
        }

        debug!(
            alpha,
            beta,
            gamma,
            sse = state.sse,
            converged = optimum.converged,
            "fitted Holt-Winters weights"
        );

        Ok(TrainedHoltWinters {
            name: self.name.clone(),
            period,
            alpha,
            beta,
            gamma,
            level: state.level,
            trend: state.trend,
            seasonals: state.seasonals,
            n: values.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltWinters {
    /// Smoothing weights `(alpha, beta, gamma)`
    pub fn weights(&self) -> (f64, f64, f64) {
        (self.alpha, self.beta, self.gamma)
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizon: usize) -> Result<PointForecast> {
        let values = (1..=horizon)
            .map(|h| {
                let season = self.seasonals[(self.n - 1 + h) % self.period];
                self.level + h as f64 * self.trend + season
            })
            .collect();

        PointForecast::new(values, horizon)
            .map_err(|e| ForecastError::fitting(MODEL, e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
