//! Regression abstractions used by the forecasting models.
//!
//! Model estimation reduces to fitting linear regressions on lagged
//! feature rows. The traits here are the seam between the forecasters
//! and the concrete estimator.

use crate::error::Result;

/// One regression observation: a feature vector and its target label.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub features: Vec<f64>,
    pub label: f64,
}

impl TrainingRow {
    pub fn new(features: Vec<f64>, label: f64) -> Self {
        Self { features, label }
    }
}

/// A fitted regression model that scores feature vectors.
pub trait RegressionModel: std::fmt::Debug {
    /// Predict the label for a feature vector.
    ///
    /// The feature vector must have the same length as the rows the
    /// model was trained on.
    fn predict(&self, features: &[f64]) -> f64;
}

/// A regression estimator that fits a model to training rows.
///
/// All rows passed to [`train`](RegressionTrainer::train) must share
/// one feature length. Zero-length features are allowed and produce an
/// intercept-only model.
pub trait RegressionTrainer {
    type Model: RegressionModel;

    fn train(&self, rows: &[TrainingRow]) -> Result<Self::Model>;
}
