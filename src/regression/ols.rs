//! Ordinary least squares estimation.
//!
//! Solves the normal equations by Cholesky decomposition with a small
//! ridge term on the diagonal for numerical stability.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{ForecastError, Result};
use crate::regression::traits::{RegressionModel, RegressionTrainer, TrainingRow};

const DEFAULT_RIDGE: f64 = 1e-8;

/// OLS trainer fitting `y = intercept + X @ coefficients`.
#[derive(Debug, Clone)]
pub struct OlsTrainer {
    ridge: f64,
    compute_statistics: bool,
}

impl OlsTrainer {
    pub fn new() -> Self {
        Self {
            ridge: DEFAULT_RIDGE,
            compute_statistics: false,
        }
    }

    /// Enable coefficient summary statistics on trained models.
    pub fn with_statistics() -> Self {
        Self {
            ridge: DEFAULT_RIDGE,
            compute_statistics: true,
        }
    }
}

impl Default for OlsTrainer {
    fn default() -> Self {
        Self::new()
    }
}

/// A fitted least-squares model.
#[derive(Debug, Clone)]
pub struct OlsModel {
    coefficients: Vec<f64>,
    intercept: f64,
    summary: Option<OlsSummary>,
}

impl OlsModel {
    /// Regression coefficients, one per feature.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Intercept term.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Summary statistics, present when the trainer was configured to
    /// compute them and the fit had residual degrees of freedom.
    pub fn summary(&self) -> Option<&OlsSummary> {
        self.summary.as_ref()
    }
}

impl RegressionModel for OlsModel {
    fn predict(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len(), self.coefficients.len());
        let mut value = self.intercept;
        for (coef, x) in self.coefficients.iter().zip(features) {
            value += coef * x;
        }
        value
    }
}

/// Per-parameter inference statistics. Index 0 is the intercept,
/// followed by one entry per feature.
#[derive(Debug, Clone)]
pub struct OlsSummary {
    pub standard_errors: Vec<f64>,
    pub t_values: Vec<f64>,
    pub p_values: Vec<f64>,
}

impl RegressionTrainer for OlsTrainer {
    type Model = OlsModel;

    fn train(&self, rows: &[TrainingRow]) -> Result<OlsModel> {
        let n = rows.len();
        if n == 0 {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }

        let k = rows[0].features.len();
        for row in rows {
            if row.features.len() != k {
                return Err(ForecastError::DimensionMismatch {
                    expected: k,
                    got: row.features.len(),
                });
            }
        }

        if k == 0 {
            // No regressors, the mean is the least-squares intercept
            let intercept = rows.iter().map(|r| r.label).sum::<f64>() / n as f64;
            return Ok(OlsModel {
                coefficients: vec![],
                intercept,
                summary: None,
            });
        }

        // Build X'X and X'y over the design matrix [1, x1, ..., xk]
        let num_params = k + 1;
        let mut xtx = vec![vec![0.0; num_params]; num_params];
        let mut xty = vec![0.0; num_params];

        for row in rows {
            let y_obs = row.label;

            xtx[0][0] += 1.0;
            for j in 0..k {
                let xj = row.features[j];
                xtx[0][j + 1] += xj;
                xtx[j + 1][0] += xj;
            }
            for i in 0..k {
                let xi = row.features[i];
                for j in 0..k {
                    xtx[i + 1][j + 1] += xi * row.features[j];
                }
            }

            xty[0] += y_obs;
            for i in 0..k {
                xty[i + 1] += row.features[i] * y_obs;
            }
        }

        // Small regularization on the diagonal for numerical stability
        for i in 0..num_params {
            xtx[i][i] += self.ridge;
        }

        let l = cholesky_decompose(&xtx).ok_or_else(|| {
            ForecastError::Estimation("design matrix is not positive definite".into())
        })?;
        let beta = cholesky_solve(&l, &xty);

        let summary = if self.compute_statistics {
            summarize(rows, &beta, &l)?
        } else {
            None
        };

        Ok(OlsModel {
            intercept: beta[0],
            coefficients: beta[1..].to_vec(),
            summary,
        })
    }
}

/// Standard errors, t-statistics, and two-sided p-values for the
/// fitted parameters. Returns `None` when there are no residual
/// degrees of freedom.
fn summarize(rows: &[TrainingRow], beta: &[f64], l: &[Vec<f64>]) -> Result<Option<OlsSummary>> {
    let n = rows.len();
    let num_params = beta.len();
    if n <= num_params {
        return Ok(None);
    }
    let dof = (n - num_params) as f64;

    let mut ssr = 0.0;
    for row in rows {
        let mut fitted = beta[0];
        for (coef, x) in beta[1..].iter().zip(&row.features) {
            fitted += coef * x;
        }
        let resid = row.label - fitted;
        ssr += resid * resid;
    }
    let sigma2 = ssr / dof;

    let dist =
        StudentsT::new(0.0, 1.0, dof).map_err(|e| ForecastError::Estimation(e.to_string()))?;

    let mut standard_errors = Vec::with_capacity(num_params);
    let mut t_values = Vec::with_capacity(num_params);
    let mut p_values = Vec::with_capacity(num_params);

    // Diagonal of (X'X)^-1 via one triangular solve per unit vector
    let mut unit = vec![0.0; num_params];
    for i in 0..num_params {
        unit[i] = 1.0;
        let column = cholesky_solve(l, &unit);
        unit[i] = 0.0;

        let se = (sigma2 * column[i]).max(0.0).sqrt();
        let t = beta[i] / se;
        let p = if t.is_finite() {
            2.0 * (1.0 - dist.cdf(t.abs()))
        } else {
            0.0
        };

        standard_errors.push(se);
        t_values.push(t);
        p_values.push(p);
    }

    Ok(Some(OlsSummary {
        standard_errors,
        t_values,
        p_values,
    }))
}

/// Cholesky decomposition `A = L @ L'` of a symmetric positive
/// definite matrix. Returns `None` when A is not positive definite
/// or a pivot fails to stay finite.
fn cholesky_decompose(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    if n == 0 {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                // Overflowed accumulations reach this pivot as NaN or inf
                if !(sum.is_finite() && sum > 0.0) {
                    return None; // Not positive definite
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L @ L' @ x = b` given the Cholesky factor L.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}
