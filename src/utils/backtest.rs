//! Walk-forward evaluation driven by one-step updates.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::metrics::{calculate_metrics, AccuracyMetrics};

/// Results from a walk-forward evaluation.
#[derive(Debug, Clone)]
pub struct WalkForwardReport {
    /// One-step forecasts, one per held-out observation.
    pub forecasts: Vec<f64>,
    /// Held-out actual values.
    pub actuals: Vec<f64>,
    /// Accuracy metrics over the held-out span.
    pub metrics: AccuracyMetrics,
}

/// Evaluate a model by fitting once and rolling forward one step at a time.
///
/// The model is fitted on the first `train_len` observations. For each
/// remaining observation a one-step forecast is recorded, then the model
/// state is advanced with the true value. Coefficients are estimated
/// once and never refreshed.
///
/// The first recorded forecast comes from the freshly fitted state,
/// which sits one step behind the end of the training window.
pub fn walk_forward<F, Factory>(
    series: &TimeSeries,
    train_len: usize,
    model_factory: Factory,
) -> Result<WalkForwardReport>
where
    F: Forecaster,
    Factory: Fn() -> F,
{
    if train_len == 0 {
        return Err(ForecastError::InvalidParameter(
            "train_len must be positive".to_string(),
        ));
    }
    let n = series.len();
    if train_len >= n {
        return Err(ForecastError::InsufficientData {
            needed: train_len + 1,
            got: n,
        });
    }

    let train_series = series.slice(0, train_len)?;
    let mut model = model_factory();
    model.fit(&train_series)?;

    let values = series.values();
    let mut forecasts = Vec::with_capacity(n - train_len);
    let mut actuals = Vec::with_capacity(n - train_len);

    for &truth in &values[train_len..] {
        let step = model.predict(1)?;
        forecasts.push(step.values()[0]);
        actuals.push(truth);
        model.update(truth)?;
    }

    let metrics = calculate_metrics(&actuals, &forecasts)?;
    log::debug!(
        "walk-forward over {} steps: rmse {}",
        forecasts.len(),
        metrics.rmse
    );

    Ok(WalkForwardReport {
        forecasts,
        actuals,
        metrics,
    })
}
