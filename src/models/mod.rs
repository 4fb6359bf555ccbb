//! Forecasting models.

mod traits;

pub mod arima;
pub mod arma;

pub use arima::{ArimaOrder, ARIMA};
pub use arma::ARMA;
pub use traits::{BoxedForecaster, Forecaster};
