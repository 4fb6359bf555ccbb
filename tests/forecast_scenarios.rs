//! End-to-end forecasting scenarios exercising the public API.

use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rollcast::models::BoxedForecaster;
use rollcast::prelude::*;
use rollcast::utils::walk_forward;

fn make_series(values: Vec<f64>) -> TimeSeries {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<DateTime<Utc>> = (0..values.len())
        .map(|i| base + Duration::hours(i as i64))
        .collect();
    TimeSeries::new(timestamps, values).unwrap()
}

#[test]
fn arma_extends_a_linear_ramp() {
    let series = make_series((1..=10).map(f64::from).collect());

    let mut model = ARMA::new(1, 0);
    model.fit(&series).unwrap();

    // The fitted state trails the series end by one step, so the
    // forecast starts at the last observed value.
    let forecast = model.predict(3).unwrap();
    assert_relative_eq!(forecast.values()[0], 10.0, epsilon = 1e-3);
    assert_relative_eq!(forecast.values()[1], 11.0, epsilon = 1e-3);
    assert_relative_eq!(forecast.values()[2], 12.0, epsilon = 1e-3);

    model.update(11.0).unwrap();
    assert_relative_eq!(model.predict(1).unwrap().values()[0], 12.0, epsilon = 1e-3);
}

#[test]
fn arima_holds_a_constant_level_through_differencing() {
    let series = make_series(vec![5.0, 5.0, 5.0, 5.0, 5.0]);

    let mut model = ARIMA::new(0, 1, 0);
    model.fit(&series).unwrap();

    let forecast = model.predict(3).unwrap();
    for value in forecast.values() {
        assert_relative_eq!(*value, 5.0, epsilon = 1e-10);
    }

    // A jump in level propagates through the difference state
    model.update(7.0).unwrap();
    assert_relative_eq!(model.predict(1).unwrap().values()[0], 7.0, epsilon = 1e-10);
}

#[test]
fn arima_double_difference_continues_a_quadratic() {
    let values: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
    let series = make_series(values);

    let mut model = ARIMA::new(0, 2, 0);
    model.fit(&series).unwrap();

    let forecast = model.predict(2).unwrap();
    assert_relative_eq!(forecast.values()[0], 100.0, epsilon = 1e-8);
    assert_relative_eq!(forecast.values()[1], 121.0, epsilon = 1e-8);
}

#[test]
fn arima_with_ar_follows_triangular_growth() {
    let values: Vec<f64> = (1..=10).map(|i| (i * (i + 1) / 2) as f64).collect();
    let series = make_series(values);

    let mut model = ARIMA::new(1, 1, 0);
    model.fit(&series).unwrap();

    let forecast = model.predict(3).unwrap();
    assert_relative_eq!(forecast.values()[0], 65.0, epsilon = 1e-4);
    assert_relative_eq!(forecast.values()[1], 76.0, epsilon = 1e-4);
    assert_relative_eq!(forecast.values()[2], 88.0, epsilon = 1e-4);
}

#[test]
fn arma_recovers_ar1_dynamics_from_simulated_data() {
    // y_t = 0.7 * y_{t-1} + noise
    let mut rng = StdRng::seed_from_u64(42);
    let mut values = vec![0.0_f64];
    for _ in 1..200 {
        let noise: f64 = rng.random_range(-1.0..1.0);
        values.push(0.7 * values[values.len() - 1] + noise);
    }
    let series = make_series(values);

    let mut model = ARMA::new(1, 0);
    model.fit(&series).unwrap();

    let ar = model.ar_coefficients().unwrap()[0];
    assert!(ar > 0.3 && ar < 1.0, "ar coefficient {} off target", ar);
    assert!(model.intercept().unwrap().abs() < 1.0);

    let forecast = model.predict(10).unwrap();
    assert!(forecast.values().iter().all(|v| v.is_finite()));
}

#[test]
fn walk_forward_one_step_errors_stay_near_noise_level() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut values = vec![0.0_f64];
    for _ in 1..120 {
        let noise: f64 = rng.random_range(-1.0..1.0);
        values.push(0.7 * values[values.len() - 1] + noise);
    }
    let series = make_series(values);

    let report = walk_forward(&series, 100, || ARMA::new(1, 0)).unwrap();

    assert_eq!(report.forecasts.len(), 20);
    // One-step errors should be on the order of the innovation noise
    assert!(report.metrics.rmse < 1.5, "rmse {}", report.metrics.rmse);
}

#[test]
fn mixed_models_run_behind_the_forecaster_trait() {
    let values: Vec<f64> = (0..30).map(|i| 50.0 + 2.0 * i as f64).collect();
    let series = make_series(values);

    let mut models: Vec<BoxedForecaster> = vec![
        Box::new(ARMA::new(1, 0)),
        Box::new(ARIMA::new(1, 1, 0)),
        Box::new(ARIMA::new(0, 1, 0)),
    ];

    for model in &mut models {
        model.fit(&series).unwrap();
        assert!(model.is_fitted());

        let forecast = model.predict(4).unwrap();
        assert_eq!(forecast.horizon(), 4);
        assert!(forecast.values().iter().all(|v| v.is_finite()));

        model.update(110.0).unwrap();
    }
}

#[test]
fn forecast_metrics_close_the_loop() {
    let values: Vec<f64> = (1..=25).map(f64::from).collect();
    let series = make_series(values.clone());

    let train = series.slice(0, 20).unwrap();
    let mut model = ARMA::new(1, 0);
    model.fit(&train).unwrap();

    // Skip the first stale step by advancing with the next observation
    model.update(values[20]).unwrap();
    let forecast = model.predict(4).unwrap();

    let metrics = calculate_metrics(&values[21..], forecast.values()).unwrap();
    assert!(metrics.rmse < 0.1, "rmse {}", metrics.rmse);
    assert!(metrics.r_squared > 0.99);
}
