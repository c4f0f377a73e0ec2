//! Trailing moving averages
//!
//! Windows expand over the first `period - 1` observations: until a full
//! window is available the average is taken over every value seen so far,
//! so a rolling series is defined from its very first point.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) with an expanding warm-up
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        // Remove oldest value if we have more than period values
        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Average over the last `min(period, seen)` values
    pub fn value(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(MathError::InsufficientData(
                "No values seen yet for SMA calculation".to_string(),
            ));
        }

        Ok(self.sum / self.values.len() as f64)
    }

    /// Whether a full window of values has been seen
    pub fn is_warm(&self) -> bool {
        self.values.len() == self.period
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Trailing mean of every point in `values` over a window of `period`.
///
/// The output has the same length as the input.
pub fn rolling_mean(values: &[f64], period: usize) -> Result<Vec<f64>> {
    let mut sma = SimpleMovingAverage::new(period)?;

    values
        .iter()
        .map(|&v| {
            sma.update(v);
            sma.value()
        })
        .collect()
}

/// Mean of the trailing `min(period, len)` observations
pub fn trailing_mean(values: &[f64], period: usize) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty series".to_string(),
        ));
    }
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string(),
        ));
    }

    let window = period.min(values.len());
    let tail = &values[values.len() - window..];
    Ok(tail.iter().sum::<f64>() / window as f64)
}
