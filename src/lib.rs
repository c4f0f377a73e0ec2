//! # Stock Owl
//!
//! Workspace facade for the stock_owl crates.
//!
//! - [`stock_math`]: statistical building blocks
//! - [`demand_forecast`]: demand forecasting, trend analysis and stockout risk
//!
//! ## Example
//!
//! ```
//! use stock_owl_workspace::demand_forecast::{DemandForecaster, ForecastMethod, TimeSeries};
//!
//! // Without history the forecaster falls back to its default forecast
//! let forecaster = DemandForecaster::default();
//! let forecast = forecaster.forecast(&TimeSeries::default(), 7, ForecastMethod::Auto);
//! assert!(forecast.is_default());
//! assert_eq!(forecast.values, vec![5.0; 7]);
//! ```

pub use demand_forecast;
pub use stock_math;
