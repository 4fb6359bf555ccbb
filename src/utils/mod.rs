//! Utility functions for forecasting models.

pub mod backtest;
pub mod metrics;
pub mod window;

pub use backtest::{walk_forward, WalkForwardReport};
pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use window::{first_difference, sliding_windows, SlidingWindows};
