use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use demand_forecast::data::TimeSeries;
use demand_forecast::models::{
    Arima, ForecastModel, HoltWinters, LinearTrend, SimpleMA, TrainedForecastModel,
};
use demand_forecast::ForecastError;
use rstest::rstest;

const WEEKLY_PATTERN: [f64; 7] = [10.0, 12.0, 15.0, 14.0, 11.0, 20.0, 24.0];

fn series(values: Vec<f64>) -> TimeSeries {
    TimeSeries::from_values(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values)
}

fn weekly(weeks: usize) -> TimeSeries {
    series(WEEKLY_PATTERN.iter().copied().cycle().take(weeks * 7).collect())
}

#[test]
fn test_moving_average_flat_forecast() {
    let model = SimpleMA::new(7).unwrap();
    let trained = model.train(&series(vec![10.0; 7])).unwrap();

    let forecast = trained.forecast(3).unwrap();

    assert_eq!(forecast.values(), &[10.0, 10.0, 10.0]);
    assert_eq!(forecast.horizon(), 3);
}

#[test]
fn test_moving_average_uses_trailing_window() {
    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let trained = SimpleMA::default().train(&series(values)).unwrap();

    // Mean of 4..=10
    let forecast = trained.forecast(2).unwrap();
    assert_abs_diff_eq!(forecast.values()[0], 7.0, epsilon = 1e-12);
}

#[test]
fn test_moving_average_short_history_averages_everything() {
    let trained = SimpleMA::new(7)
        .unwrap()
        .train(&series(vec![2.0, 4.0, 6.0]))
        .unwrap();
    assert_eq!(trained.effective_window(), 3);
    assert_abs_diff_eq!(trained.last_average(), 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(trained.forecast(1).unwrap().values()[0], 4.0, epsilon = 1e-12);
}

#[test]
fn test_moving_average_rejects_bad_input() {
    assert!(SimpleMA::new(0).is_err());
    assert!(SimpleMA::default().train(&TimeSeries::default()).is_err());
}

#[test]
fn test_holt_winters_continues_exact_season() {
    let data = weekly(4);
    let trained = HoltWinters::new(7).unwrap().train(&data).unwrap();

    let forecast = trained.forecast(14).unwrap();

    for (h, value) in forecast.values().iter().enumerate() {
        assert_abs_diff_eq!(*value, WEEKLY_PATTERN[h % 7], epsilon = 1e-6);
    }

    let (alpha, beta, gamma) = trained.weights();
    for weight in [alpha, beta, gamma] {
        assert!(weight > 0.0 && weight < 1.0);
    }
}

#[rstest]
#[case(0)]
#[case(7)]
#[case(13)]
fn test_holt_winters_needs_two_seasons(#[case] len: usize) {
    let result = HoltWinters::new(7).unwrap().train(&series(vec![5.0; len]));
    assert!(matches!(result, Err(ForecastError::ModelFitting { .. })));
}

#[test]
fn test_holt_winters_rejects_short_period() {
    assert!(HoltWinters::new(1).is_err());
}

#[test]
fn test_arima_follows_linear_growth() {
    let values: Vec<f64> = (1..=40).map(f64::from).collect();
    let trained = Arima::default().train(&series(values)).unwrap();

    let forecast = trained.forecast(3).unwrap();

    assert_abs_diff_eq!(forecast.values()[0], 41.0, epsilon = 0.5);
    assert_abs_diff_eq!(forecast.values()[2], 43.0, epsilon = 1.5);
    assert!(trained.ar_coefficients()[0].abs() < 1.0);
    assert!(trained.ma_coefficients()[0].abs() < 1.0);
}

#[test]
fn test_arima_order_and_short_series() {
    assert!(Arima::new(0, 1, 0).is_err());
    assert_eq!(Arima::default().order(), (1, 1, 1));

    let result = Arima::default().train(&series(vec![1.0, 2.0, 3.0]));
    assert!(matches!(result, Err(ForecastError::ModelFitting { .. })));
}

#[test]
fn test_linear_trend_extrapolates() {
    let values: Vec<f64> = (0..20).map(|i| 3.0 + 2.0 * i as f64).collect();
    let trained = LinearTrend::new().train(&series(values)).unwrap();

    let forecast = trained.forecast(2).unwrap();

    assert_abs_diff_eq!(forecast.values()[0], 43.0, epsilon = 1e-9);
    assert_abs_diff_eq!(forecast.values()[1], 45.0, epsilon = 1e-9);
    assert_abs_diff_eq!(trained.fit().slope, 2.0, epsilon = 1e-9);
}

#[test]
fn test_clamping_removes_negative_demand() {
    let values: Vec<f64> = (0..10).map(|i| 20.0 - 3.0 * i as f64).collect();
    let forecast = LinearTrend::new()
        .train(&series(values))
        .unwrap()
        .forecast(5)
        .unwrap();

    assert!(forecast.values().iter().any(|v| *v < 0.0));
    let clamped = forecast.clamp_non_negative();
    assert!(clamped.values().iter().all(|v| *v >= 0.0));
}
