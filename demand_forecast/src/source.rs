//! Sales and product data sources

use crate::data::SalesRecord;
use crate::error::{ForecastError, Result};
use crate::risk::ProductInfo;
use chrono::{Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Provider of historical sales and product metadata
pub trait SalesDataSource {
    /// Daily sales within the lookback window, summed per product and day and
    /// ordered by product then date. `None` returns every product.
    fn historical_sales(&self, product_id: Option<u64>, lookback_days: u32)
        -> Result<Vec<SalesRecord>>;

    /// Metadata of one product, `None` when it does not exist
    fn product_info(&self, product_id: u64) -> Result<Option<ProductInfo>>;

    /// All products ordered by name
    fn all_products(&self) -> Result<Vec<ProductInfo>>;
}

/// Data source backed by vectors held in memory
#[derive(Debug, Clone)]
pub struct InMemorySource {
    products: Vec<ProductInfo>,
    sales: Vec<SalesRecord>,
    as_of: NaiveDate,
}

impl InMemorySource {
    /// Lookback windows end at `as_of`, inclusive
    pub fn new(products: Vec<ProductInfo>, sales: Vec<SalesRecord>, as_of: NaiveDate) -> Self {
        Self {
            products,
            sales,
            as_of,
        }
    }

    /// Anchor lookback windows at the most recent sale, or today without sales
    pub fn anchored_at_latest_sale(products: Vec<ProductInfo>, sales: Vec<SalesRecord>) -> Self {
        let as_of = sales
            .iter()
            .map(|s| s.sale_date)
            .max()
            .unwrap_or_else(|| Utc::now().date_naive());
        Self::new(products, sales, as_of)
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }
}

impl SalesDataSource for InMemorySource {
    fn historical_sales(
        &self,
        product_id: Option<u64>,
        lookback_days: u32,
    ) -> Result<Vec<SalesRecord>> {
        // Windows reaching past the calendar start keep every sale
        let start = self
            .as_of
            .checked_sub_signed(Duration::days(i64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN);

        let mut daily: BTreeMap<(u64, NaiveDate), (f64, f64)> = BTreeMap::new();
        for sale in self.sales.iter().filter(|s| {
            product_id.map_or(true, |id| s.product_id == id)
                && s.sale_date >= start
                && s.sale_date <= self.as_of
        }) {
            let entry = daily
                .entry((sale.product_id, sale.sale_date))
                .or_insert((0.0, 0.0));
            entry.0 += sale.quantity_sold;
            entry.1 += sale.revenue;
        }

        Ok(daily
            .into_iter()
            .map(|((id, date), (quantity, revenue))| SalesRecord::new(id, date, quantity, revenue))
            .collect())
    }

    fn product_info(&self, product_id: u64) -> Result<Option<ProductInfo>> {
        Ok(self.products.iter().find(|p| p.id == product_id).cloned())
    }

    fn all_products(&self) -> Result<Vec<ProductInfo>> {
        let mut products = self.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}

/// Loader for `products.csv` and `sales.csv` exports.
///
/// Product columns:
/// `id,name,price,current_stock,reorder_point[,reorder_quantity][,lead_time_days]`.
/// Sales columns: `product_id,sale_date,quantity_sold[,revenue]` with ISO dates.
pub struct CsvSource;

impl CsvSource {
    /// Read both files into an [`InMemorySource`].
    ///
    /// Without `as_of` the lookback window ends at the latest sale.
    pub fn open(
        products_path: &Path,
        sales_path: &Path,
        as_of: Option<NaiveDate>,
    ) -> Result<InMemorySource> {
        let products = Self::read_products(open_file(products_path)?)?;
        let sales = Self::read_sales(open_file(sales_path)?)?;
        info!(
            products = products.len(),
            sales = sales.len(),
            "loaded CSV data"
        );

        Ok(match as_of {
            Some(date) => InMemorySource::new(products, sales, date),
            None => InMemorySource::anchored_at_latest_sale(products, sales),
        })
    }

    pub fn read_products<R: Read>(reader: R) -> Result<Vec<ProductInfo>> {
        let mut reader = csv::Reader::from_reader(reader);
        let products = reader.deserialize().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(products)
    }

    pub fn read_sales<R: Read>(reader: R) -> Result<Vec<SalesRecord>> {
        let mut reader = csv::Reader::from_reader(reader);
        let sales = reader.deserialize().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sales)
    }
}

fn open_file(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ForecastError::Upstream(format!("cannot open {}: {}", path.display(), e)))
}
