//! Demand forecaster: method selection, fallback chain and confidence bounds

use crate::config::ForecastConfig;
use crate::data::{SalesRecord, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{
    Arima, ForecastModel, HoltWinters, LinearTrend, SimpleMA, TrainedForecastModel,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stock_math::{stats, trend_slope};
use tracing::{debug, warn};

/// Fewer observations than this yield the default forecast
pub const MIN_HISTORY_POINTS: usize = 7;
/// Absolute day-over-day slope above which a series counts as trending
pub const TREND_THRESHOLD: f64 = 0.1;

const DEFAULT_DAILY_DEMAND: f64 = 5.0;
const DEFAULT_LOWER_BOUND: f64 = 1.0;
const DEFAULT_UPPER_BOUND: f64 = 10.0;
const DEFAULT_CONFIDENCE: f64 = 0.5;
const MOVING_AVERAGE_WINDOW: usize = 7;

/// Forecasting method requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Pick a strategy from the length and trend of the history
    #[default]
    Auto,
    MovingAverage,
    ExponentialSmoothing,
    Arima,
    LinearRegression,
}

impl ForecastMethod {
    /// Resolve to a concrete strategy for `series`
    pub fn resolve(self, series: &TimeSeries) -> Strategy {
        match self {
            ForecastMethod::Auto => Strategy::select_for(series),
            ForecastMethod::MovingAverage => Strategy::MovingAverage,
            ForecastMethod::ExponentialSmoothing => Strategy::ExponentialSmoothing,
            ForecastMethod::Arima => Strategy::Arima,
            ForecastMethod::LinearRegression => Strategy::LinearRegression,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::Auto => "auto",
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::ExponentialSmoothing => "exponential_smoothing",
            ForecastMethod::Arima => "arima",
            ForecastMethod::LinearRegression => "linear_regression",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ForecastMethod::Auto),
            "moving_average" => Ok(ForecastMethod::MovingAverage),
            "exponential_smoothing" => Ok(ForecastMethod::ExponentialSmoothing),
            "arima" => Ok(ForecastMethod::Arima),
            "linear_regression" => Ok(ForecastMethod::LinearRegression),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown forecasting method: {}",
                other
            ))),
        }
    }
}

/// A concrete forecasting strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    MovingAverage,
    ExponentialSmoothing,
    Arima,
    LinearRegression,
}

impl Strategy {
    /// Automatic choice: short histories get moving average, medium ones
    /// smoothing, long ones linear regression when clearly trending.
    pub fn select_for(series: &TimeSeries) -> Strategy {
        match series.len() {
            n if n < 14 => Strategy::MovingAverage,
            n if n < 30 => Strategy::ExponentialSmoothing,
            _ if trend_slope(series.values()).abs() > TREND_THRESHOLD => {
                Strategy::LinearRegression
            }
            _ => Strategy::ExponentialSmoothing,
        }
    }

    /// Strategies tried in order, starting with `self`, until one succeeds
    pub fn fallback_chain(self) -> &'static [Strategy] {
        match self {
            Strategy::Arima => &[
                Strategy::Arima,
                Strategy::ExponentialSmoothing,
                Strategy::MovingAverage,
            ],
            Strategy::ExponentialSmoothing => {
                &[Strategy::ExponentialSmoothing, Strategy::MovingAverage]
            }
            Strategy::LinearRegression => &[Strategy::LinearRegression, Strategy::MovingAverage],
            Strategy::MovingAverage => &[Strategy::MovingAverage],
        }
    }

    /// Whether the strategy fits on the outlier-cleaned series
    fn uses_cleaned_series(self) -> bool {
        matches!(self, Strategy::ExponentialSmoothing | Strategy::Arima)
    }
}

/// Method that actually produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedMethod {
    /// Fixed fallback for histories too short to model
    Default,
    MovingAverage,
    ExponentialSmoothing,
    Arima,
    LinearRegression,
}

impl From<Strategy> for AppliedMethod {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::MovingAverage => AppliedMethod::MovingAverage,
            Strategy::ExponentialSmoothing => AppliedMethod::ExponentialSmoothing,
            Strategy::Arima => AppliedMethod::Arima,
            Strategy::LinearRegression => AppliedMethod::LinearRegression,
        }
    }
}

/// Dated demand forecast with confidence bounds.
///
/// `dates`, `values`, `upper_bound` and `lower_bound` are parallel and every
/// value is non-negative with `lower_bound <= values <= upper_bound`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub method: AppliedMethod,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
    pub upper_bound: Vec<f64>,
    pub lower_bound: Vec<f64>,
    pub avg_daily_demand: f64,
    pub total_forecast: f64,
    pub confidence: f64,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    pub fn is_default(&self) -> bool {
        self.method == AppliedMethod::Default
    }
}

/// Stateless demand forecaster; one instance can serve any number of requests
#[derive(Debug, Clone)]
pub struct DemandForecaster {
    seasonal_period: usize,
    outlier_threshold: f64,
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self {
            seasonal_period: 7,
            outlier_threshold: 3.0,
        }
    }
}

impl DemandForecaster {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            seasonal_period: config.seasonal_period,
            outlier_threshold: config.outlier_threshold,
        }
    }

    /// Forecast `horizon` days past the end of `series`.
    ///
    /// Never fails: short histories get the default forecast and model
    /// fitting failures fall through the strategy chain.
    pub fn forecast(
        &self,
        series: &TimeSeries,
        horizon: usize,
        method: ForecastMethod,
    ) -> ForecastResult {
        if series.len() < MIN_HISTORY_POINTS {
            return Self::default_forecast(horizon);
        }

        let strategy = method.resolve(series);
        debug!(
            requested = %method,
            selected = ?strategy,
            history = series.len(),
            "selected forecasting strategy"
        );

        let cleaned = series.without_outliers(self.outlier_threshold);

        for &candidate in strategy.fallback_chain() {
            let input = if candidate.uses_cleaned_series() {
                &cleaned
            } else {
                series
            };

            match self.run_strategy(candidate, input, horizon) {
                Ok(values) => return self.finish(candidate.into(), values, series, horizon),
                Err(e) => warn!(strategy = ?candidate, error = %e, "forecast failed, falling back"),
            }
        }

        warn!("every forecasting strategy failed, using default forecast");
        Self::default_forecast(horizon)
    }

    /// Forecast from raw sales rows.
    ///
    /// Fewer than seven rows short-circuit to the default forecast before the
    /// daily series is even built.
    pub fn forecast_sales(
        &self,
        records: &[SalesRecord],
        horizon: usize,
        method: ForecastMethod,
    ) -> ForecastResult {
        if records.len() < MIN_HISTORY_POINTS {
            return Self::default_forecast(horizon);
        }
        self.forecast(&TimeSeries::from_records(records), horizon, method)
    }

    /// Default forecast dated from today
    pub fn default_forecast(horizon: usize) -> ForecastResult {
        Self::default_forecast_from(horizon, Utc::now().date_naive())
    }

    /// Flat 5 units/day within [1, 10] at confidence 0.5, starting at `start`
    pub fn default_forecast_from(horizon: usize, start: NaiveDate) -> ForecastResult {
        ForecastResult {
            method: AppliedMethod::Default,
            dates: start.iter_days().take(horizon).collect(),
            values: vec![DEFAULT_DAILY_DEMAND; horizon],
            upper_bound: vec![DEFAULT_UPPER_BOUND; horizon],
            lower_bound: vec![DEFAULT_LOWER_BOUND; horizon],
            avg_daily_demand: DEFAULT_DAILY_DEMAND,
            total_forecast: DEFAULT_DAILY_DEMAND * horizon as f64,
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    /// Fit one strategy and return its clamped point forecast
    fn run_strategy(
        &self,
        strategy: Strategy,
        series: &TimeSeries,
        horizon: usize,
    ) -> Result<Vec<f64>> {
        let forecast = match strategy {
            Strategy::MovingAverage => SimpleMA::new(MOVING_AVERAGE_WINDOW)?
                .train(series)?
                .forecast(horizon)?,
            Strategy::ExponentialSmoothing => HoltWinters::new(self.seasonal_period)?
                .train(series)?
                .forecast(horizon)?,
            Strategy::Arima => Arima::default().train(series)?.forecast(horizon)?,
            Strategy::LinearRegression => LinearTrend::new().train(series)?.forecast(horizon)?,
        };

        Ok(forecast.clamp_non_negative().into_values())
    }

    /// Attach dates, ±2σ bounds from the raw history and the confidence score
    fn finish(
        &self,
        method: AppliedMethod,
        values: Vec<f64>,
        history: &TimeSeries,
        horizon: usize,
    ) -> ForecastResult {
        let spread = 2.0 * history.std_dev();
        let upper_bound = values.iter().map(|v| (v + spread).max(0.0)).collect();
        let lower_bound = values.iter().map(|v| (v - spread).max(0.0)).collect();
        let total_forecast: f64 = values.iter().sum();

        ForecastResult {
            method,
            dates: history.future_dates(horizon),
            avg_daily_demand: stats::mean(&values),
            total_forecast,
            upper_bound,
            lower_bound,
            values,
            confidence: Self::confidence(history),
        }
    }

    /// Confidence from data volume, and from relative variance on long histories
    pub fn confidence(series: &TimeSeries) -> f64 {
        match series.len() {
            n if n < 7 => 0.5,
            n if n < 14 => 0.65,
            n if n < 30 => 0.75,
            _ => {
                let cv = stats::coefficient_of_variation(series.values()).unwrap_or(1.0);
                (0.95 - cv).clamp(0.5, 0.95)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> TimeSeries {
        TimeSeries::from_values(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values)
    }

    #[test]
    fn test_method_round_trips_through_str() {
        for method in [
            ForecastMethod::Auto,
            ForecastMethod::MovingAverage,
            ForecastMethod::ExponentialSmoothing,
            ForecastMethod::Arima,
            ForecastMethod::LinearRegression,
        ] {
            assert_eq!(method.as_str().parse::<ForecastMethod>().unwrap(), method);
        }
        assert!("prophet".parse::<ForecastMethod>().is_err());
    }

    #[test]
    fn test_fallback_chains_end_in_moving_average() {
        for strategy in [
            Strategy::MovingAverage,
            Strategy::ExponentialSmoothing,
            Strategy::Arima,
            Strategy::LinearRegression,
        ] {
            let chain = strategy.fallback_chain();
            assert_eq!(chain[0], strategy);
            assert_eq!(*chain.last().unwrap(), Strategy::MovingAverage);
        }
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(DemandForecaster::confidence(&series(vec![1.0; 5])), 0.5);
        assert_eq!(DemandForecaster::confidence(&series(vec![1.0; 10])), 0.65);
        assert_eq!(DemandForecaster::confidence(&series(vec![1.0; 20])), 0.75);
        // Constant demand has zero variation
        assert_eq!(DemandForecaster::confidence(&series(vec![4.0; 40])), 0.95);
        // No demand at all counts as maximal variation
        assert_eq!(DemandForecaster::confidence(&series(vec![0.0; 40])), 0.5);
    }
}
