//! ARIMA models for demand forecasting
//!
//! The series is differenced `d` times, an ARMA(p, q) with intercept is fitted
//! to the differenced values by conditional sum of squares, and forecasts are
//! integrated back onto the original scale.

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, PointForecast, TrainedForecastModel};
use stock_math::optimization::{nelder_mead, NelderMeadConfig};
use tracing::debug;

const MODEL: &str = "ARIMA";
const COEFFICIENT_BOUNDS: (f64, f64) = (-0.99, 0.99);

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct Arima {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArima {
    /// Name of the model
    name: String,
    p: usize,
    q: usize,
    intercept: f64,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Differenced training series
    differenced: Vec<f64>,
    /// In-sample one-step residuals on the differenced scale
    residuals: Vec<f64>,
    /// Last value at each differencing level, used to undo the differencing
    anchors: Vec<f64>,
}

impl Arima {
    /// Create a new ARIMA(p, d, q) model
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p == 0 && q == 0 {
            return Err(ForecastError::InvalidParameter(
                "ARIMA needs at least one AR or MA term".to_string(),
            ));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
        })
    }

    /// Orders `(p, d, q)`
    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }

    /// One-step predictions and residuals for the given parameters
    fn residuals(diff: &[f64], p: usize, q: usize, params: &[f64]) -> Vec<f64> {
        let intercept = params[0];
        let ar = &params[1..1 + p];
        let ma = &params[1 + p..1 + p + q];
        let start = p.max(q);

        let mut residuals = vec![0.0; diff.len()];
        for t in start..diff.len() {
            let mut prediction = intercept;
            for (i, phi) in ar.iter().enumerate() {
                prediction += phi * (diff[t - 1 - i] - intercept);
            }
            for (j, theta) in ma.iter().enumerate() {
                prediction += theta * residuals[t - 1 - j];
            }
            residuals[t] = diff[t] - prediction;
        }

        residuals
    }
}

impl Default for Arima {
    fn default() -> Self {
        Self {
            name: "ARIMA(1,1,1)".to_string(),
            p: 1,
            d: 1,
            q: 1,
        }
    }
}

/// Difference `values` once
fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

impl ForecastModel for Arima {
    type Trained = TrainedArima;

    fn train(&self, data: &TimeSeries) -> Result<TrainedArima> {
        let values = data.values();
        if values.len() < self.min_observations() {
            return Err(ForecastError::fitting(
                MODEL,
                format!(
                    "insufficient data for {}: need at least {} observations, got {}",
                    self.name,
                    self.min_observations(),
                    values.len()
                ),
            ));
        }

        let mut anchors = Vec::with_capacity(self.d);
        let mut diff = values.to_vec();
        for _ in 0..self.d {
            if let Some(&last) = diff.last() {
                anchors.push(last);
            }
            diff = difference(&diff);
        }

        let (p, q) = (self.p, self.q);
        let mean = diff.iter().sum::<f64>() / diff.len() as f64;

        let mut initial = vec![mean];
        initial.extend((0..p).map(|i| 0.1 / (i + 1) as f64));
        initial.extend((0..q).map(|i| 0.1 / (i + 1) as f64));

        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat(COEFFICIENT_BOUNDS).take(p + q));

        let start = p.max(q);
        let optimum = nelder_mead(
            |params| {
                Self::residuals(&diff, p, q, params)[start..]
                    .iter()
                    .map(|e| e * e)
                    .sum()
            },
            &initial,
            &bounds,
            NelderMeadConfig::default(),
        )
        .map_err(|e| ForecastError::fitting(MODEL, e.to_string()))?;

        if optimum.point.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::fitting(
                MODEL,
                "parameter estimates are not finite",
            ));
        }

        let residuals = Self::residuals(&diff, p, q, &optimum.point);
        debug!(
            model = %self.name,
            css = optimum.value,
            converged = optimum.converged,
            "fitted ARIMA coefficients"
        );

        Ok(TrainedArima {
            name: self.name.clone(),
            p,
            q,
            intercept: optimum.point[0],
            ar_coefficients: optimum.point[1..1 + p].to_vec(),
            ma_coefficients: optimum.point[1 + p..].to_vec(),
            differenced: diff,
            residuals,
            anchors,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArima {
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Forecast on the differenced scale; future shocks are zero
    fn forecast_differenced(&self, horizon: usize) -> Vec<f64> {
        let mut history = self.differenced.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..horizon {
            let t = history.len();
            let mut prediction = self.intercept;
            for (i, phi) in self.ar_coefficients.iter().enumerate().take(self.p) {
                if let Some(x) = t.checked_sub(1 + i).map(|k| history[k]) {
                    prediction += phi * (x - self.intercept);
                }
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate().take(self.q) {
                if let Some(e) = t.checked_sub(1 + j).map(|k| shocks[k]) {
                    prediction += theta * e;
                }
            }
            history.push(prediction);
            shocks.push(0.0);
        }

        history.split_off(self.differenced.len())
    }
}

impl TrainedForecastModel for TrainedArima {
    fn forecast(&self, horizon: usize) -> Result<PointForecast> {
        let mut forecasts = self.forecast_differenced(horizon);

        // Undo each differencing level, innermost first
        for &anchor in self.anchors.iter().rev() {
            let mut level = anchor;
            for value in forecasts.iter_mut() {
                level += *value;
                *value = level;
            }
        }

        PointForecast::new(forecasts, horizon)
            .map_err(|e| ForecastError::fitting(MODEL, e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
