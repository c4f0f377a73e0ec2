//! Sales records and daily demand series

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stock_math::{outliers, stats};

/// One day of sales for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_id: u64,
    pub sale_date: NaiveDate,
    pub quantity_sold: f64,
    #[serde(default)]
    pub revenue: f64,
}

impl SalesRecord {
    pub fn new(product_id: u64, sale_date: NaiveDate, quantity_sold: f64, revenue: f64) -> Self {
        Self {
            product_id,
            sale_date,
            quantity_sold,
            revenue,
        }
    }
}

/// Daily demand series with one entry per calendar day.
///
/// Dates are strictly increasing and contiguous; days without sales carry 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from parallel date and value vectors, checking contiguity
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        if let Some(pair) = dates.windows(2).find(|w| w[0].succ_opt() != Some(w[1])) {
            return Err(ForecastError::DataError(format!(
                "Dates must be consecutive days, found {} followed by {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self { dates, values })
    }

    /// Create a series of consecutive days starting at `start`
    pub fn from_values(start: NaiveDate, values: Vec<f64>) -> Self {
        let dates = start.iter_days().take(values.len()).collect();
        Self { dates, values }
    }

    /// Prepare a daily series from raw sales rows.
    ///
    /// Rows on the same day are summed, the result spans the earliest to the
    /// latest observed date and missing days are filled with 0. No rows yields
    /// an empty series.
    pub fn from_records(records: &[SalesRecord]) -> Self {
        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            *daily.entry(record.sale_date).or_insert(0.0) += record.quantity_sold;
        }

        match (daily.keys().next(), daily.keys().next_back()) {
            (Some(&start), Some(&end)) => Self::fill_missing_dates(&daily, start, end),
            _ => Self::default(),
        }
    }

    /// Reindex observations onto every day in `[start, end]`, zero-filling gaps
    pub fn fill_missing_dates(
        observed: &BTreeMap<NaiveDate, f64>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
        let values = dates
            .iter()
            .map(|d| observed.get(d).copied().unwrap_or(0.0))
            .collect();

        Self { dates, values }
    }

    /// Number of days in the series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn mean(&self) -> f64 {
        stats::mean(&self.values)
    }

    /// Sample standard deviation of the raw values
    pub fn std_dev(&self) -> f64 {
        stats::std_dev(&self.values)
    }

    /// Copy of the series with z-score outliers replaced by the median.
    ///
    /// The receiver is left untouched so raw statistics stay available.
    pub fn without_outliers(&self, threshold: f64) -> TimeSeries {
        TimeSeries {
            dates: self.dates.clone(),
            values: outliers::replace_outliers(&self.values, threshold),
        }
    }

    /// The `horizon` calendar days following the last observation
    pub fn future_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        match self.last_date() {
            Some(last) => last.iter_days().skip(1).take(horizon).collect(),
            None => Vec::new(),
        }
    }
}
