//! Forecast output structure.

/// Point forecasts for one or more future steps, nearest step first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    point: Vec<f64>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self { point: Vec::new() }
    }

    /// Create a forecast from point predictions.
    pub fn from_values(point: Vec<f64>) -> Self {
        Self { point }
    }

    /// Get point forecasts.
    pub fn values(&self) -> &[f64] {
        &self.point
    }

    /// Consume the forecast, returning the point predictions.
    pub fn into_values(self) -> Vec<f64> {
        self.point
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if the forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }
}
