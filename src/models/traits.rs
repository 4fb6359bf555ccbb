//! Forecaster trait defining the common interface for all models.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for all forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Generate predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Advance the model state by one newly observed value.
    ///
    /// Coefficients stay frozen; only the internal lag and residual
    /// state moves forward. The model must already be fitted.
    fn update(&mut self, value: f64) -> Result<()>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use rollcast::models::{BoxedForecaster, Forecaster, ARMA};
///
/// let model: BoxedForecaster = Box::new(ARMA::new(1, 0));
/// assert_eq!(model.name(), "ARMA");
/// assert!(!model.is_fitted());
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;
