//! Least-squares line fitting against the observation index
//!
//! Demand series are daily and gap-free, so the regressor is simply the
//! position `0..n-1` of each observation.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Fitted line `value = slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of observations the line was fitted on
    pub n: usize,
}

impl LinearFit {
    /// Fit an ordinary least-squares line of `values` against their index
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for a line fit. Need at least 2 points.".to_string(),
            ));
        }

        let n = values.len() as f64;

        // Calculate means
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        if !slope.is_finite() {
            return Err(MathError::CalculationError(
                "Slope is not finite; series contains non-finite values".to_string(),
            ));
        }

        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
            n: values.len(),
        })
    }

    /// Value of the line at an arbitrary index
    pub fn predict(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }

    /// Extrapolate `horizon` points past the last fitted index
    pub fn extrapolate(&self, horizon: usize) -> Vec<f64> {
        (self.n..self.n + horizon)
            .map(|i| self.predict(i as f64))
            .collect()
    }

    /// Coefficient of determination of the fit on `values`
    pub fn r_squared(&self, values: &[f64]) -> Result<f64> {
        if values.len() != self.n {
            return Err(MathError::InvalidInput(format!(
                "Expected {} values, got {}",
                self.n,
                values.len()
            )));
        }

        let y_mean = values.iter().sum::<f64>() / values.len() as f64;

        let mut ss_total = 0.0; // total sum of squares
        let mut ss_residual = 0.0; // residual sum of squares

        for (i, &y) in values.iter().enumerate() {
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - self.predict(i as f64)).powi(2);
        }

        if ss_total.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate R-squared: total sum of squares is too small".to_string(),
            ));
        }

        Ok(1.0 - (ss_residual / ss_total))
    }
}

/// Slope of the least-squares line, 0.0 when fewer than two points
pub fn trend_slope(values: &[f64]) -> f64 {
    LinearFit::fit(values).map(|fit| fit.slope).unwrap_or(0.0)
}
