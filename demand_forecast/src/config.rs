//! Service configuration
//!
//! Sources are layered in this order, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `config/stock_owl.toml` (optional) or an explicitly given file (required)
//! 3. Environment variables `STOCK_OWL__<FIELD>`

use crate::error::{ForecastError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "config/stock_owl";
const ENV_PREFIX: &str = "STOCK_OWL";
/// Longest sales history a product lookup may request, about a century
pub const MAX_HISTORY_DAYS: u32 = 36_500;

/// Tunables for forecasting and the inventory reports built on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Days of sales history fetched per product
    pub history_days: u32,
    /// Horizon used when a request does not name one
    pub default_forecast_days: usize,
    /// Season length for seasonal indices and Holt-Winters
    pub seasonal_period: usize,
    /// Absolute z-score above which a point is treated as an outlier
    pub outlier_threshold: f64,
    /// Minimum risk score reported by the stockout risk scan
    pub high_risk_threshold: f64,
    /// Number of products in the best-seller report
    pub top_products_limit: usize,
    /// Forecasts below this confidence are flagged as low confidence
    pub confidence_threshold: f64,
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            history_days: 90,
            default_forecast_days: 30,
            seasonal_period: 7,
            outlier_threshold: 3.0,
            high_risk_threshold: 0.5,
            top_products_limit: 10,
            confidence_threshold: 0.7,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ForecastConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => {
                info!("Loading configuration from {}", p.display());
                File::from(p).required(true)
            }
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: ForecastConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the forecasting core cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.history_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "history_days must be positive".to_string(),
            ));
        }
        if self.history_days > MAX_HISTORY_DAYS {
            return Err(ForecastError::InvalidParameter(format!(
                "history_days must be at most {}",
                MAX_HISTORY_DAYS
            )));
        }
        if self.seasonal_period < 2 {
            return Err(ForecastError::InvalidParameter(
                "seasonal_period must be at least 2".to_string(),
            ));
        }
        if !(self.outlier_threshold > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "outlier_threshold must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.high_risk_threshold) {
            return Err(ForecastError::InvalidParameter(
                "high_risk_threshold must be within [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ForecastError::InvalidParameter(
                "confidence_threshold must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}
