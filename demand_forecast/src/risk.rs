//! Stockout risk classification and reorder quantities

use crate::data::{SalesRecord, TimeSeries};
use crate::forecaster::{DemandForecaster, ForecastMethod, ForecastResult};
use serde::{Deserialize, Serialize};
use stock_math::stats::round_to;
use tracing::debug;

/// Days of average demand held as safety stock, also added to the horizon
pub const SAFETY_DAYS: u32 = 7;
/// Reported when there is no foreseeable stockout
pub const NO_STOCKOUT_DAYS: f64 = 999.0;
/// Smallest reorder quantity ever recommended
pub const MIN_REORDER_QTY: u64 = 10;

fn default_lead_time() -> u32 {
    7
}

/// Product metadata snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub current_stock: f64,
    pub reorder_point: f64,
    #[serde(default)]
    pub reorder_quantity: f64,
    #[serde(default = "default_lead_time")]
    pub lead_time_days: u32,
}

/// Risk tier, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_days(days_until_stockout: f64) -> Self {
        match days_until_stockout {
            d if d <= 3.0 => RiskLevel::Critical,
            d if d <= 7.0 => RiskLevel::High,
            d if d <= 14.0 => RiskLevel::Medium,
            d if d <= 30.0 => RiskLevel::Low,
            _ => RiskLevel::VeryLow,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            RiskLevel::Critical => 1.0,
            RiskLevel::High => 0.75,
            RiskLevel::Medium => 0.5,
            RiskLevel::Low => 0.25,
            RiskLevel::VeryLow => 0.1,
        }
    }
}

/// Stockout assessment for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockoutRisk {
    pub product_id: u64,
    pub product_name: String,
    pub current_stock: f64,
    pub avg_daily_demand: f64,
    pub forecast_demand: f64,
    pub days_until_stockout: f64,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub shortfall: f64,
    pub recommended_reorder_qty: u64,
}

/// Safety stock plus lead time demand minus stock on hand, raised to the
/// product's own reorder quantity and never below [`MIN_REORDER_QTY`].
pub fn reorder_quantity(
    avg_daily_demand: f64,
    lead_time_days: u32,
    current_stock: f64,
    configured_qty: f64,
) -> u64 {
    let safety_stock = avg_daily_demand * f64::from(SAFETY_DAYS);
    let lead_time_demand = avg_daily_demand * f64::from(lead_time_days);
    let mut qty = safety_stock + lead_time_demand - current_stock;

    if configured_qty > 0.0 {
        qty = qty.max(configured_qty);
    }

    let qty = qty.ceil();
    if qty.is_finite() && qty > MIN_REORDER_QTY as f64 {
        qty as u64
    } else {
        MIN_REORDER_QTY
    }
}

/// Days the current stock lasts at `avg_daily_demand`
pub fn days_until_stockout(current_stock: f64, avg_daily_demand: f64) -> f64 {
    if avg_daily_demand == 0.0 {
        NO_STOCKOUT_DAYS
    } else {
        current_stock / avg_daily_demand
    }
}

/// Runs a forecast over the lead time plus a safety buffer and grades it
#[derive(Debug, Clone, Default)]
pub struct StockoutPredictor {
    forecaster: DemandForecaster,
}

impl StockoutPredictor {
    pub fn new(forecaster: DemandForecaster) -> Self {
        Self { forecaster }
    }

    /// Grade a prepared daily series
    pub fn assess(&self, product: &ProductInfo, history: &TimeSeries) -> StockoutRisk {
        let forecast = self
            .forecaster
            .forecast(history, Self::horizon(product), ForecastMethod::Auto);
        Self::grade(product, &forecast)
    }

    /// Grade raw sales rows; fewer than seven rows use the default forecast
    pub fn assess_sales(&self, product: &ProductInfo, records: &[SalesRecord]) -> StockoutRisk {
        let forecast = self
            .forecaster
            .forecast_sales(records, Self::horizon(product), ForecastMethod::Auto);
        Self::grade(product, &forecast)
    }

    /// Lead time plus the safety buffer
    fn horizon(product: &ProductInfo) -> usize {
        (product.lead_time_days as usize).saturating_add(SAFETY_DAYS as usize)
    }

    fn grade(product: &ProductInfo, forecast: &ForecastResult) -> StockoutRisk {
        let avg = forecast.avg_daily_demand;
        let days = days_until_stockout(product.current_stock, avg);
        let risk_level = RiskLevel::from_days(days);
        let shortfall = (forecast.total_forecast - product.current_stock).max(0.0);

        debug!(
            product_id = product.id,
            method = ?forecast.method,
            avg_daily_demand = avg,
            days_until_stockout = days,
            "assessed stockout risk"
        );

        StockoutRisk {
            product_id: product.id,
            product_name: product.name.clone(),
            current_stock: product.current_stock,
            avg_daily_demand: round_to(avg, 2),
            forecast_demand: round_to(forecast.total_forecast, 2),
            days_until_stockout: round_to(days, 1),
            risk_level,
            risk_score: risk_level.score(),
            shortfall: round_to(shortfall, 2),
            recommended_reorder_qty: reorder_quantity(
                avg,
                product.lead_time_days,
                product.current_stock,
                product.reorder_quantity,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskLevel::from_days(3.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_days(3.01), RiskLevel::High);
        assert_eq!(RiskLevel::from_days(14.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_days(30.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_days(NO_STOCKOUT_DAYS), RiskLevel::VeryLow);
    }

    #[test]
    fn test_reorder_quantity_floor_and_configured() {
        assert_eq!(reorder_quantity(0.0, 7, 100.0, 0.0), MIN_REORDER_QTY);
        assert_eq!(reorder_quantity(10.0, 7, 20.0, 0.0), 120);
        assert_eq!(reorder_quantity(1.0, 7, 0.0, 50.0), 50);
        assert_eq!(reorder_quantity(1.05, 7, 0.0, 0.0), 15);
    }

    #[test]
    fn test_horizon_does_not_overflow_lead_time() {
        let product = ProductInfo {
            id: 1,
            name: "Pallet".to_string(),
            price: 1.0,
            current_stock: 0.0,
            reorder_point: 0.0,
            reorder_quantity: 0.0,
            lead_time_days: u32::MAX,
        };
        assert_eq!(
            StockoutPredictor::horizon(&product),
            u32::MAX as usize + SAFETY_DAYS as usize
        );
    }

    #[test]
    fn test_zero_demand_never_stocks_out() {
        assert_eq!(days_until_stockout(5.0, 0.0), NO_STOCKOUT_DAYS);
        assert_eq!(days_until_stockout(0.0, 10.0), 0.0);
    }
}
