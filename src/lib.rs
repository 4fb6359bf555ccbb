//! # rollcast
//!
//! Time series forecasting with ARMA and ARIMA models estimated by
//! two-stage least squares.
//!
//! Models are fitted once and then rolled forward: multi-step forecasts
//! feed predictions back as lags, and [`models::Forecaster::update`]
//! advances the internal state with new observations without
//! re-estimating coefficients.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod regression;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{ArimaOrder, Forecaster, ARIMA, ARMA};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
