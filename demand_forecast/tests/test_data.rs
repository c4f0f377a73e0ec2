use chrono::NaiveDate;
use demand_forecast::data::{SalesRecord, TimeSeries};
use demand_forecast::risk::ProductInfo;
use demand_forecast::source::{CsvSource, InMemorySource, SalesDataSource};
use demand_forecast::ForecastError;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use std::io::Write;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn product(id: u64, name: &str) -> ProductInfo {
    ProductInfo {
        id,
        name: name.to_string(),
        price: 1.0,
        current_stock: 10.0,
        reorder_point: 5.0,
        reorder_quantity: 0.0,
        lead_time_days: 7,
    }
}

#[test]
fn test_same_day_rows_are_summed_and_gaps_zero_filled() {
    let records = vec![
        SalesRecord::new(1, day(1, 4), 4.0, 8.0),
        SalesRecord::new(1, day(1, 1), 2.0, 4.0),
        SalesRecord::new(1, day(1, 1), 3.0, 6.0),
    ];

    let series = TimeSeries::from_records(&records);

    assert_eq!(series.dates(), &[day(1, 1), day(1, 2), day(1, 3), day(1, 4)]);
    assert_eq!(series.values(), &[5.0, 0.0, 0.0, 4.0]);
}

#[test]
fn test_empty_records_give_empty_series() {
    let series = TimeSeries::from_records(&[]);
    assert!(series.is_empty());
    assert_eq!(series.first_date(), None);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
fn test_prepared_series_has_no_gaps(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = day(1, 1);
    let records: Vec<SalesRecord> = (0..40)
        .map(|_| {
            let offset = rng.gen_range(0..90);
            let quantity = rng.gen_range(1..20) as f64;
            SalesRecord::new(1, start + chrono::Duration::days(offset), quantity, 0.0)
        })
        .collect();

    let series = TimeSeries::from_records(&records);

    for pair in series.dates().windows(2) {
        assert_eq!((pair[1] - pair[0]).num_days(), 1);
    }
    let total: f64 = records.iter().map(|r| r.quantity_sold).sum();
    let prepared: f64 = series.values().iter().sum();
    assert_eq!(prepared, total);
}

#[test]
fn test_outlier_cleaning_leaves_original_untouched() {
    let mut values = vec![10.0; 20];
    values.push(1000.0);
    let series = TimeSeries::from_values(day(1, 1), values);

    let cleaned = series.without_outliers(3.0);

    assert_eq!(cleaned.values()[20], 10.0);
    assert_eq!(series.values()[20], 1000.0);
    assert_eq!(cleaned.dates(), series.dates());
}

#[test]
fn test_in_memory_lookback_window_and_grouping() {
    let sales = vec![
        SalesRecord::new(1, day(1, 20), 1.0, 1.0),
        SalesRecord::new(1, day(1, 21), 2.0, 2.0),
        SalesRecord::new(1, day(1, 21), 3.0, 3.0),
        SalesRecord::new(2, day(1, 25), 4.0, 8.0),
        SalesRecord::new(1, day(1, 31), 5.0, 5.0),
        SalesRecord::new(1, day(2, 1), 6.0, 6.0),
    ];
    let source = InMemorySource::new(vec![product(1, "a")], sales, day(1, 31));

    let history = source.historical_sales(Some(1), 10).unwrap();
    assert_eq!(
        history,
        vec![
            SalesRecord::new(1, day(1, 21), 5.0, 5.0),
            SalesRecord::new(1, day(1, 31), 5.0, 5.0),
        ]
    );

    let all = source.historical_sales(None, 10).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].product_id, 2);
}

#[test]
fn test_lookback_beyond_calendar_start_keeps_all_sales() {
    let sales = vec![
        SalesRecord::new(1, day(1, 2), 1.0, 1.0),
        SalesRecord::new(1, day(1, 3), 2.0, 2.0),
    ];
    let source = InMemorySource::new(vec![product(1, "a")], sales, day(1, 3));

    let history = source.historical_sales(Some(1), u32::MAX).unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn test_products_listed_by_name() {
    let source = InMemorySource::new(
        vec![product(1, "Zinc"), product(2, "Anvil"), product(3, "Hammer")],
        Vec::new(),
        day(1, 1),
    );

    let names: Vec<String> = source
        .all_products()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Anvil", "Hammer", "Zinc"]);
    assert!(source.product_info(4).unwrap().is_none());
}

#[test]
fn test_csv_source_reads_optional_columns() {
    let dir = tempfile::tempdir().unwrap();
    let products_path = dir.path().join("products.csv");
    let sales_path = dir.path().join("sales.csv");

    let mut products = std::fs::File::create(&products_path).unwrap();
    writeln!(products, "id,name,price,current_stock,reorder_point").unwrap();
    writeln!(products, "1,Widget,2.5,40,10").unwrap();

    let mut sales = std::fs::File::create(&sales_path).unwrap();
    writeln!(sales, "product_id,sale_date,quantity_sold").unwrap();
    writeln!(sales, "1,2024-03-01,4").unwrap();
    writeln!(sales, "1,2024-03-03,6").unwrap();

    let source = CsvSource::open(&products_path, &sales_path, None).unwrap();

    assert_eq!(source.as_of(), day(3, 3));
    let widget = source.product_info(1).unwrap().unwrap();
    assert_eq!(widget.lead_time_days, 7);
    assert_eq!(widget.reorder_quantity, 0.0);

    let history = source.historical_sales(Some(1), 90).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].revenue, 0.0);
}

#[test]
fn test_csv_source_missing_file_is_upstream_failure() {
    let dir = tempfile::tempdir().unwrap();
    let result = CsvSource::open(
        &dir.path().join("products.csv"),
        &dir.path().join("sales.csv"),
        None,
    );
    assert!(matches!(result, Err(ForecastError::Upstream(_))));
}

#[test]
fn test_csv_malformed_row_is_an_error() {
    let data = "product_id,sale_date,quantity_sold\n1,not-a-date,4\n";
    assert!(CsvSource::read_sales(data.as_bytes()).is_err());
}
