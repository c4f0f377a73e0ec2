//! Descriptive statistics over demand series
//!
//! Thin wrappers around `statrs` that give well-defined values for the
//! degenerate inputs a sparse sales history produces: an empty slice has
//! mean 0, and fewer than two observations have standard deviation 0.

use statrs::statistics::{Data, Median, Statistics};

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::mean(values)
}

/// Sample standard deviation (n - 1 denominator), 0.0 below two observations
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    Statistics::std_dev(values)
}

/// Median, 0.0 for an empty slice
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Data::new(values.to_vec()).median()
}

/// Smallest observation, 0.0 for an empty slice
pub fn min(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::min(values)
}

/// Largest observation, 0.0 for an empty slice
pub fn max(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::max(values)
}

/// Coefficient of variation `std / mean`.
///
/// Returns `None` when the mean is not positive, leaving the caller to pick
/// the substitute value its metric calls for.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values);
    if m > 0.0 {
        Some(std_dev(values) / m)
    } else {
        None
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
