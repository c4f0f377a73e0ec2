//! Z-score outlier handling
//!
//! A point is an outlier when its distance from the series mean exceeds
//! `threshold` sample standard deviations. Flagged points are replaced by the
//! series median, which keeps a single promotional spike from dragging a
//! model fit.

use crate::stats::{mean, median, std_dev};

/// Flag every point whose absolute z-score exceeds `threshold`.
///
/// A constant series (zero deviation) has no outliers.
pub fn detect_outliers(values: &[f64], threshold: f64) -> Vec<bool> {
    let sd = std_dev(values);
    if sd == 0.0 || !sd.is_finite() {
        return vec![false; values.len()];
    }
    let m = mean(values);

    values
        .iter()
        .map(|v| ((v - m) / sd).abs() > threshold)
        .collect()
}

/// Copy of `values` with every outlier replaced by the median of `values`
pub fn replace_outliers(values: &[f64], threshold: f64) -> Vec<f64> {
    let flags = detect_outliers(values, threshold);
    if !flags.iter().any(|&f| f) {
        return values.to_vec();
    }

    let replacement = median(values);
    values
        .iter()
        .zip(flags)
        .map(|(&v, outlier)| if outlier { replacement } else { v })
        .collect()
}
