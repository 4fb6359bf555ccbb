//! Linear regression estimators backing the forecasting models.

mod ols;
mod traits;

pub use ols::{OlsModel, OlsSummary, OlsTrainer};
pub use traits::{RegressionModel, RegressionTrainer, TrainingRow};
