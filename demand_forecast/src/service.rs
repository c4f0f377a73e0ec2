//! Inventory insights built on the forecasting core.
//!
//! Single-product operations surface [`ForecastError::NotFound`] and data
//! source failures. Bulk operations skip products that fail, log them and
//! report whatever succeeded.

use crate::config::ForecastConfig;
use crate::data::SalesRecord;
use crate::error::{ForecastError, Result};
use crate::forecaster::{DemandForecaster, ForecastMethod, ForecastResult};
use crate::risk::{ProductInfo, RiskLevel, StockoutPredictor, StockoutRisk};
use crate::source::SalesDataSource;
use crate::trends::{TrendAnalysis, TrendAnalyzer, TrendDirection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stock_math::stats::round_to;
use tracing::{info, warn};

/// Window of the sales summary and best-seller reports
const RECENT_SALES_DAYS: u32 = 30;

/// Parameters of a forecast request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastRequest {
    /// Horizon in days, the configured default when absent
    pub days_ahead: Option<usize>,
    pub method: ForecastMethod,
}

/// Results of a bulk operation with the number that succeeded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport<T> {
    pub count: usize,
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for BatchReport<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductForecast {
    pub product_id: u64,
    pub product_name: String,
    pub current_stock: f64,
    /// Confidence fell below the configured threshold
    pub low_confidence: bool,
    #[serde(flatten)]
    pub forecast: ForecastResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTrends {
    pub product_id: u64,
    pub product_name: String,
    #[serde(flatten)]
    pub trends: TrendAnalysis,
}

/// Restock advice for a product at or below its reorder point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockRecommendation {
    pub product_id: u64,
    pub product_name: String,
    pub current_stock: f64,
    pub reorder_point: f64,
    pub recommended_order_qty: u64,
    pub avg_daily_demand: f64,
    pub days_until_stockout: f64,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub trend_direction: TrendDirection,
    pub growth_rate: f64,
    pub estimated_cost: f64,
    pub lead_time_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_products: usize,
    pub total_stock_value: f64,
    pub low_stock_products: usize,
    pub total_sales_30d: u64,
    pub total_revenue_30d: f64,
}

/// Units and revenue of one product over the recent window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    pub product_id: u64,
    pub product_name: String,
    pub quantity_sold: f64,
    pub revenue: f64,
}

/// Forecasts, trends and stock reports over a [`SalesDataSource`]
pub struct InventoryInsights<S> {
    source: S,
    forecaster: DemandForecaster,
    analyzer: TrendAnalyzer,
    predictor: StockoutPredictor,
    config: ForecastConfig,
}

impl<S: SalesDataSource> InventoryInsights<S> {
    pub fn new(source: S, config: ForecastConfig) -> Self {
        let forecaster = DemandForecaster::new(&config);
        Self {
            source,
            analyzer: TrendAnalyzer::new(config.seasonal_period),
            predictor: StockoutPredictor::new(forecaster.clone()),
            forecaster,
            config,
        }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Forecast demand for one product
    pub fn forecast_product(
        &self,
        product_id: u64,
        request: &ForecastRequest,
    ) -> Result<ProductForecast> {
        let product = self.product(product_id)?;
        self.forecast_for(&product, request)
    }

    /// Forecast every product, skipping those that fail
    pub fn forecast_all(&self, request: &ForecastRequest) -> Result<BatchReport<ProductForecast>> {
        let forecasts = self.per_product("forecast", |product| {
            self.forecast_for(product, request).map(Some)
        })?;
        info!(count = forecasts.len(), "forecasted all products");
        Ok(forecasts.into())
    }

    /// Products whose risk score reaches the configured threshold, riskiest first
    pub fn stockout_risks(&self) -> Result<BatchReport<StockoutRisk>> {
        let threshold = self.config.high_risk_threshold;
        let mut risks = self.per_product("stockout risk", |product| {
            let risk = self.assess(product)?;
            Ok((risk.risk_score >= threshold).then_some(risk))
        })?;

        risks.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        info!(count = risks.len(), threshold, "scanned stockout risks");
        Ok(risks.into())
    }

    /// Trend analysis of one product
    pub fn product_trends(&self, product_id: u64) -> Result<ProductTrends> {
        let product = self.product(product_id)?;
        let history = self.history(product.id)?;
        Ok(self.trends_for(&product, &history))
    }

    /// Trend analysis of every product that has sales history
    pub fn all_trends(&self) -> Result<BatchReport<ProductTrends>> {
        let trends = self.per_product("trend analysis", |product| {
            let history = self.history(product.id)?;
            if history.is_empty() {
                return Ok(None);
            }
            Ok(Some(self.trends_for(product, &history)))
        })?;
        Ok(trends.into())
    }

    /// Restock advice for products at or below their reorder point, riskiest first
    pub fn restock_recommendations(&self) -> Result<BatchReport<RestockRecommendation>> {
        let mut recommendations = self.per_product("restock recommendation", |product| {
            if product.current_stock > product.reorder_point {
                return Ok(None);
            }

            let history = self.history(product.id)?;
            let risk = self.predictor.assess_sales(product, &history);
            let trends = self.analyzer.analyze_sales(&history);

            Ok(Some(RestockRecommendation {
                product_id: product.id,
                product_name: product.name.clone(),
                current_stock: product.current_stock,
                reorder_point: product.reorder_point,
                recommended_order_qty: risk.recommended_reorder_qty,
                avg_daily_demand: risk.avg_daily_demand,
                days_until_stockout: risk.days_until_stockout,
                risk_level: risk.risk_level,
                risk_score: risk.risk_score,
                trend_direction: trends.trend_direction,
                growth_rate: trends.growth_rate,
                estimated_cost: risk.recommended_reorder_qty as f64 * product.price,
                lead_time_days: product.lead_time_days,
            }))
        })?;

        recommendations.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        Ok(recommendations.into())
    }

    /// Stock value and recent sales across all products
    pub fn analytics_summary(&self) -> Result<AnalyticsSummary> {
        let products = self.source.all_products()?;
        let recent = self.source.historical_sales(None, RECENT_SALES_DAYS)?;

        let total_stock_value: f64 = products.iter().map(|p| p.current_stock * p.price).sum();
        let total_units: f64 = recent.iter().map(|s| s.quantity_sold).sum();
        let total_revenue: f64 = recent.iter().map(|s| s.revenue).sum();

        Ok(AnalyticsSummary {
            total_products: products.len(),
            total_stock_value: round_to(total_stock_value, 2),
            low_stock_products: products
                .iter()
                .filter(|p| p.current_stock <= p.reorder_point)
                .count(),
            total_sales_30d: total_units.max(0.0) as u64,
            total_revenue_30d: round_to(total_revenue, 2),
        })
    }

    /// Best sellers by units over the recent window
    pub fn top_products(&self) -> Result<Vec<TopProduct>> {
        let names: BTreeMap<u64, String> = self
            .source
            .all_products()?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let mut totals: BTreeMap<u64, (f64, f64)> = BTreeMap::new();
        for sale in self.source.historical_sales(None, RECENT_SALES_DAYS)? {
            let entry = totals.entry(sale.product_id).or_insert((0.0, 0.0));
            entry.0 += sale.quantity_sold;
            entry.1 += sale.revenue;
        }

        let mut top: Vec<TopProduct> = totals
            .into_iter()
            .filter_map(|(id, (quantity_sold, revenue))| {
                names.get(&id).map(|name| TopProduct {
                    product_id: id,
                    product_name: name.clone(),
                    quantity_sold,
                    revenue,
                })
            })
            .collect();

        top.sort_by(|a, b| b.quantity_sold.total_cmp(&a.quantity_sold));
        top.truncate(self.config.top_products_limit);
        Ok(top)
    }

    fn product(&self, product_id: u64) -> Result<ProductInfo> {
        self.source
            .product_info(product_id)?
            .ok_or(ForecastError::NotFound { product_id })
    }

    fn history(&self, product_id: u64) -> Result<Vec<SalesRecord>> {
        self.source
            .historical_sales(Some(product_id), self.config.history_days)
    }

    fn assess(&self, product: &ProductInfo) -> Result<StockoutRisk> {
        let history = self.history(product.id)?;
        Ok(self.predictor.assess_sales(product, &history))
    }

    fn forecast_for(
        &self,
        product: &ProductInfo,
        request: &ForecastRequest,
    ) -> Result<ProductForecast> {
        let history = self.history(product.id)?;
        let horizon = request
            .days_ahead
            .unwrap_or(self.config.default_forecast_days);
        let forecast = self
            .forecaster
            .forecast_sales(&history, horizon, request.method);

        Ok(ProductForecast {
            product_id: product.id,
            product_name: product.name.clone(),
            current_stock: product.current_stock,
            low_confidence: forecast.confidence < self.config.confidence_threshold,
            forecast,
        })
    }

    fn trends_for(&self, product: &ProductInfo, history: &[SalesRecord]) -> ProductTrends {
        ProductTrends {
            product_id: product.id,
            product_name: product.name.clone(),
            trends: self.analyzer.analyze_sales(history),
        }
    }

    /// Run `op` for every product, dropping `None` and logging failures
    fn per_product<T, F>(&self, operation: &str, op: F) -> Result<Vec<T>>
    where
        F: Fn(&ProductInfo) -> Result<Option<T>>,
    {
        let products = self.source.all_products()?;
        let mut items = Vec::with_capacity(products.len());

        for product in &products {
            match op(product) {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(e) => warn!(
                    product_id = product.id,
                    error = %e,
                    "{} failed, skipping product",
                    operation
                ),
            }
        }

        Ok(items)
    }
}
