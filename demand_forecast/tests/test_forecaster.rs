use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use demand_forecast::data::{SalesRecord, TimeSeries};
use demand_forecast::forecaster::{
    AppliedMethod, DemandForecaster, ForecastMethod, ForecastResult, Strategy,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::{fixture, rstest};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn series(values: Vec<f64>) -> TimeSeries {
    TimeSeries::from_values(start(), values)
}

fn noisy_series(seed: u64, len: usize, mean: f64, std_dev: f64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, std_dev).unwrap();
    series(
        (0..len)
            .map(|_| normal.sample(&mut rng).max(0.0).round())
            .collect(),
    )
}

#[fixture]
fn forecaster() -> DemandForecaster {
    DemandForecaster::default()
}

fn assert_well_formed(result: &ForecastResult, horizon: usize) {
    assert_eq!(result.dates.len(), horizon);
    assert_eq!(result.values.len(), horizon);
    assert_eq!(result.upper_bound.len(), horizon);
    assert_eq!(result.lower_bound.len(), horizon);

    for i in 0..horizon {
        assert!(result.lower_bound[i] >= 0.0);
        assert!(result.lower_bound[i] <= result.values[i]);
        assert!(result.values[i] <= result.upper_bound[i]);
    }
    for pair in result.dates.windows(2) {
        assert_eq!((pair[1] - pair[0]).num_days(), 1);
    }

    if result.is_default() {
        assert_eq!(result.confidence, 0.5);
    } else {
        assert!((0.5..=0.95).contains(&result.confidence));
    }
}

#[rstest]
#[case(vec![])]
#[case(vec![100.0])]
#[case(vec![0.0, 0.0, 0.0])]
#[case(vec![1.0, 50.0, 3.0, 900.0, 2.0, 7.0])]
fn test_short_history_gives_default(forecaster: DemandForecaster, #[case] values: Vec<f64>) {
    let result = forecaster.forecast(&series(values), 5, ForecastMethod::Arima);

    assert_eq!(result.method, AppliedMethod::Default);
    assert_eq!(result.values, vec![5.0; 5]);
    assert_eq!(result.lower_bound, vec![1.0; 5]);
    assert_eq!(result.upper_bound, vec![10.0; 5]);
    assert_eq!(result.confidence, 0.5);
    assert_eq!(result.avg_daily_demand, 5.0);
    assert_eq!(result.total_forecast, 25.0);
}

#[rstest]
fn test_few_sales_rows_give_default_regardless_of_span(forecaster: DemandForecaster) {
    // Six rows spread over a month would prepare into a 30 day series
    let records: Vec<SalesRecord> = (0..6)
        .map(|i| SalesRecord::new(1, start() + chrono::Duration::days(i * 6), 3.0, 3.0))
        .collect();

    let result = forecaster.forecast_sales(&records, 4, ForecastMethod::Auto);
    assert!(result.is_default());
}

#[test]
fn test_default_forecast_dates_start_at_given_day() {
    let result = DemandForecaster::default_forecast_from(3, start());
    assert_eq!(
        result.dates,
        vec![
            start(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        ]
    );
}

#[rstest]
fn test_moving_average_of_constant_history(forecaster: DemandForecaster) {
    let result = forecaster.forecast(&series(vec![10.0; 7]), 3, ForecastMethod::Auto);

    assert_eq!(result.method, AppliedMethod::MovingAverage);
    assert_eq!(result.values, vec![10.0, 10.0, 10.0]);
    assert_eq!(result.avg_daily_demand, 10.0);
    assert_eq!(result.total_forecast, 30.0);
    // Zero spread in history means the bounds collapse onto the forecast
    assert_eq!(result.upper_bound, result.values);
    assert_eq!(result.lower_bound, result.values);
    assert_eq!(result.confidence, 0.65);
}

#[rstest]
fn test_forecast_dates_follow_history(forecaster: DemandForecaster) {
    let history = series(vec![4.0; 10]);
    let result = forecaster.forecast(&history, 2, ForecastMethod::MovingAverage);

    assert_eq!(
        result.dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        ]
    );
}

#[rstest]
#[case(7, Strategy::MovingAverage)]
#[case(13, Strategy::MovingAverage)]
#[case(14, Strategy::ExponentialSmoothing)]
#[case(29, Strategy::ExponentialSmoothing)]
fn test_auto_selection_by_length(#[case] len: usize, #[case] expected: Strategy) {
    assert_eq!(Strategy::select_for(&series(vec![3.0; len])), expected);
}

#[test]
fn test_auto_selection_on_long_history_depends_on_trend() {
    let trending = series((1..=40).map(f64::from).collect());
    assert_eq!(Strategy::select_for(&trending), Strategy::LinearRegression);

    let flat = series(vec![8.0; 40]);
    assert_eq!(Strategy::select_for(&flat), Strategy::ExponentialSmoothing);
}

#[rstest]
fn test_failed_smoothing_falls_back_to_moving_average(forecaster: DemandForecaster) {
    // Ten days cannot support two weekly seasons
    let result = forecaster.forecast(
        &series(vec![6.0; 10]),
        4,
        ForecastMethod::ExponentialSmoothing,
    );

    assert_eq!(result.method, AppliedMethod::MovingAverage);
    assert_eq!(result.values, vec![6.0; 4]);
}

#[rstest]
fn test_linear_regression_uses_raw_history(forecaster: DemandForecaster) {
    let mut values: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
    values[29] = 500.0;
    let history = series(values);

    let result = forecaster.forecast(&history, 1, ForecastMethod::LinearRegression);

    assert_eq!(result.method, AppliedMethod::LinearRegression);
    // The spike is not cleaned away, so it lifts the fitted line
    assert!(result.values[0] > 40.0);
}

#[rstest]
fn test_declining_trend_is_clamped_at_zero(forecaster: DemandForecaster) {
    let history = series((0..30).map(|i| 60.0 - 2.0 * i as f64).collect());

    let result = forecaster.forecast(&history, 30, ForecastMethod::Auto);

    assert_eq!(result.method, AppliedMethod::LinearRegression);
    assert_eq!(*result.values.last().unwrap(), 0.0);
    assert_well_formed(&result, 30);
}

#[rstest]
fn test_long_history_confidence_from_variation(forecaster: DemandForecaster) {
    let history = noisy_series(3, 60, 20.0, 4.0);
    let cv = history.std_dev() / history.mean();

    let result = forecaster.forecast(&history, 7, ForecastMethod::MovingAverage);

    assert_abs_diff_eq!(result.confidence, (0.95 - cv).clamp(0.5, 0.95), epsilon = 1e-12);
}

#[rstest]
fn test_bounds_use_raw_history_spread(forecaster: DemandForecaster) {
    let history = noisy_series(11, 45, 30.0, 6.0);
    let spread = 2.0 * history.std_dev();

    let result = forecaster.forecast(&history, 5, ForecastMethod::MovingAverage);

    for (value, upper) in result.values.iter().zip(&result.upper_bound) {
        assert_abs_diff_eq!(upper - value, spread, epsilon = 1e-9);
    }
}

#[rstest]
fn test_forecasts_are_well_formed_for_every_method(
    forecaster: DemandForecaster,
    #[values(
        ForecastMethod::Auto,
        ForecastMethod::MovingAverage,
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::Arima,
        ForecastMethod::LinearRegression
    )]
    method: ForecastMethod,
    #[values(7, 15, 35, 90)] len: usize,
    #[values(1, 2)] seed: u64,
) {
    let history = noisy_series(seed, len, 12.0, 5.0);

    let result = forecaster.forecast(&history, 21, method);

    assert!(!result.is_default());
    assert_well_formed(&result, 21);
    assert_eq!(result.dates[0], history.last_date().unwrap().succ_opt().unwrap());
}
