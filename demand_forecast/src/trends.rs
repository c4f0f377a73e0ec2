//! Trend and seasonality analysis of demand histories

use crate::data::{SalesRecord, TimeSeries};
use crate::forecaster::{MIN_HISTORY_POINTS, TREND_THRESHOLD};
use serde::Serialize;
use std::collections::BTreeMap;
use stock_math::{rolling_mean, stats, trend_slope};

/// Direction of the fitted demand trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    /// Not enough history to tell
    Unknown,
}

impl TrendDirection {
    /// Classify a per-day slope
    pub fn from_slope(slope: f64) -> Self {
        if slope > TREND_THRESHOLD {
            TrendDirection::Increasing
        } else if slope < -TREND_THRESHOLD {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

/// Summary of trend, seasonality and spread of a demand series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub trend_direction: TrendDirection,
    pub trend_coefficient: f64,
    /// Percent change from the first half mean to the second half mean
    pub growth_rate: f64,
    /// Coefficient of variation in percent
    pub volatility: f64,
    /// Phase index within the period mapped to its seasonal index
    pub seasonality: Option<BTreeMap<usize, f64>>,
    #[serde(rename = "moving_average_7d")]
    pub ma7: f64,
    #[serde(rename = "moving_average_30d")]
    pub ma30: f64,
    pub min_demand: f64,
    pub max_demand: f64,
    pub avg_demand: f64,
    pub std_demand: f64,
}

impl TrendAnalysis {
    /// Result for histories too short to analyse
    pub fn unknown() -> Self {
        Self {
            trend_direction: TrendDirection::Unknown,
            trend_coefficient: 0.0,
            growth_rate: 0.0,
            volatility: 0.0,
            seasonality: None,
            ma7: 0.0,
            ma30: 0.0,
            min_demand: 0.0,
            max_demand: 0.0,
            avg_demand: 0.0,
            std_demand: 0.0,
        }
    }
}

/// Stateless trend analyzer
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    seasonal_period: usize,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self { seasonal_period: 7 }
    }
}

impl TrendAnalyzer {
    pub fn new(seasonal_period: usize) -> Self {
        Self {
            seasonal_period: seasonal_period.max(1),
        }
    }

    /// Analyse a prepared daily series
    pub fn analyze(&self, series: &TimeSeries) -> TrendAnalysis {
        if series.len() < MIN_HISTORY_POINTS {
            return TrendAnalysis::unknown();
        }

        let values = series.values();
        let trend_coefficient = trend_slope(values);

        TrendAnalysis {
            trend_direction: TrendDirection::from_slope(trend_coefficient),
            trend_coefficient,
            growth_rate: growth_rate(values),
            volatility: volatility(values),
            seasonality: seasonal_indices(values, self.seasonal_period),
            ma7: last_moving_average(values, 7),
            ma30: last_moving_average(values, 30),
            min_demand: stats::min(values),
            max_demand: stats::max(values),
            avg_demand: stats::mean(values),
            std_demand: stats::std_dev(values),
        }
    }

    /// Prepare raw sales rows and analyse them
    pub fn analyze_sales(&self, records: &[SalesRecord]) -> TrendAnalysis {
        if records.is_empty() {
            return TrendAnalysis::unknown();
        }
        self.analyze(&TimeSeries::from_records(records))
    }
}

/// Percent change between the means of the two halves, split at `n / 2`
pub fn growth_rate(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let (first, second) = values.split_at(values.len() / 2);
    let first_avg = stats::mean(first);
    if first_avg == 0.0 {
        return 0.0;
    }

    (stats::mean(second) - first_avg) / first_avg * 100.0
}

/// Coefficient of variation in percent, 0 for a zero mean
pub fn volatility(values: &[f64]) -> f64 {
    let mean = stats::mean(values);
    if mean == 0.0 {
        return 0.0;
    }
    stats::std_dev(values) / mean * 100.0
}

/// Mean of each phase `i` in `[0, period)` divided by the overall mean.
///
/// Needs at least two full periods. The indices are 1.0 when the overall
/// mean is not positive; small positive means are divided through as is.
pub fn seasonal_indices(values: &[f64], period: usize) -> Option<BTreeMap<usize, f64>> {
    if period == 0 || values.len() < 2 * period {
        return None;
    }

    let overall = stats::mean(values);
    let indices = (0..period)
        .map(|phase| {
            let phase_values: Vec<f64> =
                values.iter().skip(phase).step_by(period).copied().collect();
            let index = if overall > 0.0 {
                stats::mean(&phase_values) / overall
            } else {
                1.0
            };
            (phase, index)
        })
        .collect();

    Some(indices)
}

fn last_moving_average(values: &[f64], window: usize) -> f64 {
    rolling_mean(values, window)
        .ok()
        .and_then(|ma| ma.last().copied())
        .unwrap_or(0.0)
}
