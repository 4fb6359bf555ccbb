//! ARMA (Autoregressive Moving Average) model.
//!
//! Estimation is a two-stage least-squares scheme. A long surrogate
//! autoregression of order `m = 2 * max(p, q)` is fitted first; its
//! residuals stand in for the unobservable innovations. The final
//! model then regresses each value on its `p` lags and the `q` most
//! recent innovation proxies in one combined regression.

use std::collections::VecDeque;

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::regression::{OlsTrainer, RegressionModel, RegressionTrainer, TrainingRow};
use crate::utils::window::sliding_windows;

/// ARMA(p, q) forecasting model.
///
/// After fitting, the model keeps only its coefficients and a short
/// window of recent lags and innovation proxies. Forecasts are rolled
/// out recursively, feeding each prediction back as the next lag with
/// future innovations taken as zero.
#[derive(Debug)]
pub struct ARMA<T: RegressionTrainer = OlsTrainer> {
    p: usize,
    q: usize,
    /// Surrogate autoregression order, `2 * max(p, q)`.
    m: usize,
    trainer: T,
    model: Option<T::Model>,
    last_lags: VecDeque<f64>,
    last_residuals: VecDeque<f64>,
}

impl ARMA<OlsTrainer> {
    /// Create a new ARMA(p, q) model with the default OLS trainer.
    pub fn new(p: usize, q: usize) -> Self {
        Self::with_trainer(p, q, OlsTrainer::new())
    }

    /// Fitted AR coefficients, one per lag.
    pub fn ar_coefficients(&self) -> Option<&[f64]> {
        self.model.as_ref().map(|m| &m.coefficients()[..self.p])
    }

    /// Fitted MA coefficients, one per innovation proxy.
    pub fn ma_coefficients(&self) -> Option<&[f64]> {
        self.model.as_ref().map(|m| &m.coefficients()[self.p..])
    }

    /// Fitted intercept.
    pub fn intercept(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.intercept())
    }
}

impl<T: RegressionTrainer> ARMA<T> {
    /// Create an ARMA(p, q) model backed by a custom trainer.
    pub fn with_trainer(p: usize, q: usize, trainer: T) -> Self {
        Self {
            p,
            q,
            m: 2 * p.max(q),
            trainer,
            model: None,
            last_lags: VecDeque::new(),
            last_residuals: VecDeque::new(),
        }
    }

    /// Model order as `(p, q)`.
    pub fn order(&self) -> (usize, usize) {
        (self.p, self.q)
    }

    /// Minimum number of observations required to fit.
    pub fn min_observations(&self) -> usize {
        self.m + self.p + self.q + 2
    }

    fn fit_slice(&mut self, x: &[f64]) -> Result<()> {
        let n = x.len();
        let needed = self.min_observations();
        if n < needed {
            return Err(ForecastError::InsufficientData { needed, got: n });
        }

        let (p, q, m) = (self.p, self.q, self.m);

        // Stage 1: surrogate AR(m) whose residuals proxy the innovations.
        // z_up[i] is the proxy for time index m + i.
        let z_up: Vec<f64> = if m == 0 {
            Vec::new()
        } else {
            let rows: Vec<TrainingRow> = sliding_windows(&x[..n - 1], m)
                .zip(&x[m..])
                .map(|(window, &label)| TrainingRow::new(window.to_vec(), label))
                .collect();
            log::debug!("fitting surrogate ar({}) on {} rows", m, rows.len());
            let surrogate = self.trainer.train(&rows)?;

            let residuals: Vec<f64> = rows
                .iter()
                .map(|row| row.label - surrogate.predict(&row.features))
                .collect();
            if log::log_enabled!(log::Level::Debug) {
                let mse = residuals.iter().map(|z| z * z).sum::<f64>() / residuals.len() as f64;
                log::debug!("surrogate ar({}) rmse: {}", m, mse.sqrt());
            }
            residuals
        };

        // Stage 2: regress x[t] on lags x[t-p..t] and proxies for times
        // t-q..t. Targets start at t = m + q, dropping the leading raw
        // lag windows that have no proxy coverage.
        let mut rows = Vec::with_capacity(n - m - q);
        for j in 0..n - m - q {
            let t = m + q + j;
            let mut features = Vec::with_capacity(p + q);
            features.extend_from_slice(&x[t - p..t]);
            if q > 0 {
                features.extend_from_slice(&z_up[t - q - m..t - m]);
            }
            rows.push(TrainingRow::new(features, x[t]));
        }
        log::debug!("fitting combined ar({}) on {} rows", p + q, rows.len());
        let model = self.trainer.train(&rows)?;

        if log::log_enabled!(log::Level::Debug) {
            let mse = rows
                .iter()
                .map(|row| {
                    let e = row.label - model.predict(&row.features);
                    e * e
                })
                .sum::<f64>()
                / rows.len() as f64;
            log::debug!("combined ar({}) rmse: {}", p + q, mse.sqrt());
        }

        // Seed the rolling state from the last training row: the p lags
        // and q proxies that were used to fit the final observation.
        let mut last_lags = VecDeque::with_capacity(p);
        last_lags.extend(&x[n - 1 - p..n - 1]);
        let mut last_residuals = VecDeque::with_capacity(q);
        if q > 0 {
            last_residuals.extend(&z_up[n - 1 - q - m..n - 1 - m]);
        }

        self.model = Some(model);
        self.last_lags = last_lags;
        self.last_residuals = last_residuals;
        Ok(())
    }

    fn assemble_features(lags: &VecDeque<f64>, residuals: &VecDeque<f64>) -> Vec<f64> {
        let mut features = Vec::with_capacity(lags.len() + residuals.len());
        features.extend(lags.iter().copied());
        features.extend(residuals.iter().copied());
        features
    }

    fn one_step(&self) -> Result<f64> {
        let model = self.model.as_ref().ok_or(ForecastError::FitRequired)?;
        let features = Self::assemble_features(&self.last_lags, &self.last_residuals);
        Ok(model.predict(&features))
    }
}

impl<T: RegressionTrainer> Forecaster for ARMA<T> {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        if series.has_missing_values() {
            return Err(ForecastError::MissingValues);
        }
        self.fit_slice(series.values())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let model = self.model.as_ref().ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::new());
        }

        let mut lags = self.last_lags.clone();
        let mut residuals = self.last_residuals.clone();
        let mut points = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let features = Self::assemble_features(&lags, &residuals);
            let predicted = model.predict(&features);
            points.push(predicted);

            if self.p > 0 {
                lags.pop_front();
                lags.push_back(predicted);
            }
            if self.q > 0 {
                residuals.pop_front();
                // Future innovations are unknown, taken as zero
                residuals.push_back(0.0);
            }
        }

        Ok(Forecast::from_values(points))
    }

    fn update(&mut self, value: f64) -> Result<()> {
        if value.is_nan() || value.is_infinite() {
            return Err(ForecastError::MissingValues);
        }
        let predicted = self.one_step()?;

        if self.p > 0 {
            self.last_lags.pop_front();
            self.last_lags.push_back(value);
        }
        if self.q > 0 {
            self.last_residuals.pop_front();
            self.last_residuals.push_back(value - predicted);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ARMA"
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}
