//! # Demand Forecast
//!
//! Per-product demand forecasting and stock risk analysis for inventory systems.
//!
//! ## Features
//!
//! - Daily series preparation from raw sales rows (gap filling, outlier cleaning)
//! - Forecasting models (Moving Average, Holt-Winters, ARIMA, Linear Trend)
//! - Automatic method selection with a fallback chain that always yields a forecast
//! - Trend, growth, volatility and day-of-week seasonality analysis
//! - Stockout risk tiers and reorder quantity recommendations
//! - Bulk reports over a pluggable sales data source
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use demand_forecast::data::TimeSeries;
//! use demand_forecast::forecaster::{DemandForecaster, ForecastMethod};
//! use demand_forecast::risk::{ProductInfo, StockoutPredictor};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let history = TimeSeries::from_values(start, vec![10.0; 21]);
//!
//! let forecaster = DemandForecaster::default();
//! let forecast = forecaster.forecast(&history, 14, ForecastMethod::MovingAverage);
//! assert_eq!(forecast.values, vec![10.0; 14]);
//!
//! let product = ProductInfo {
//!     id: 1,
//!     name: "Widget".to_string(),
//!     price: 4.5,
//!     current_stock: 25.0,
//!     reorder_point: 30.0,
//!     reorder_quantity: 0.0,
//!     lead_time_days: 7,
//! };
//! let risk = StockoutPredictor::new(forecaster).assess(&product, &history);
//! assert!(risk.recommended_reorder_qty >= 10);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod logging;
pub mod models;
pub mod risk;
pub mod service;
pub mod source;
pub mod trends;

pub use config::ForecastConfig;
pub use data::{SalesRecord, TimeSeries};
pub use error::{ForecastError, Result};
pub use forecaster::{AppliedMethod, DemandForecaster, ForecastMethod, ForecastResult, Strategy};
pub use risk::{ProductInfo, RiskLevel, StockoutPredictor, StockoutRisk};
pub use service::{BatchReport, ForecastRequest, InventoryInsights};
pub use source::{CsvSource, InMemorySource, SalesDataSource};
pub use trends::{TrendAnalysis, TrendAnalyzer, TrendDirection};
