// =============================================================================
// Ordinary Least Squares
// =============================================================================
//
// Solves the normal equations
//
//     (X'X) β = X'y
//
// and reports the classical inference for each coefficient:
//
//     σ̂²     = RSS / (n − p)
//     SE(βⱼ) = sqrt(σ̂² [(X'X)⁻¹]ⱼⱼ)
//     tⱼ     = βⱼ / SE(βⱼ),   p-value from t(n − p)
//
// Before solving, the numerical rank of X is checked with an SVD. A design
// with fewer independent columns than parameters (e.g. a constant predictor
// next to the intercept) has no unique β and is rejected with `ModelFit`.
//
// A missing value (NaN) or infinity in X is rejected with `InvalidValue`
// before the rank check. A NaN in y propagates into β and the t-values.
//
// A perfect fit (RSS = 0) leaves σ̂² = 0 and the t-values infinite (or NaN
// for a zero coefficient). Those values are returned as-is.
//
// =============================================================================

use ndarray::{Array1, Array2, Zip};

use crate::convert::{numerical_rank, solve_and_invert, to_dmatrix, to_dvector};
use crate::error::{FairStatsError, Result};
use crate::inference::{confidence_interval_t, pvalue_t, Alternative};

/// Options for the OLS fit.
#[derive(Debug, Clone)]
pub struct OlsConfig {
    /// Singular values below `rank_tolerance × largest` count as zero
    /// in the rank check.
    /// Default: 1e-10
    pub rank_tolerance: f64,
}

impl Default for OlsConfig {
    fn default() -> Self {
        Self {
            rank_tolerance: 1e-10,
        }
    }
}

/// A fitted linear model.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients β, one per column of X
    pub coefficients: Array1<f64>,

    /// Standard errors of the coefficients
    pub std_errors: Array1<f64>,

    /// t-statistics βⱼ / SE(βⱼ)
    pub t_values: Array1<f64>,

    /// Two-sided p-values of the t-statistics
    pub p_values: Array1<f64>,

    /// Residual degrees of freedom n − p
    pub df_resid: f64,

    /// Residual sum of squares
    pub rss: f64,

    /// Coefficient of determination (NaN for a constant response)
    pub r_squared: f64,

    /// (X'X)⁻¹, so that Var(β̂) = σ̂² (X'X)⁻¹
    pub covariance_unscaled: Array2<f64>,
}

impl OlsFit {
    /// Confidence interval for every coefficient at the given level.
    pub fn conf_int(&self, confidence: f64) -> Vec<(f64, f64)> {
        self.coefficients
            .iter()
            .zip(self.std_errors.iter())
            .map(|(&b, &se)| confidence_interval_t(b, se, self.df_resid, confidence))
            .collect()
    }
}

/// Prepend a column of ones to a single predictor: X = [1, x].
pub fn add_constant(x: &Array1<f64>) -> Array2<f64> {
    Array2::from_shape_fn((x.len(), 2), |(i, j)| if j == 0 { 1.0 } else { x[i] })
}

pub(crate) fn fit_ols(y: &Array1<f64>, x: &Array2<f64>, config: &OlsConfig) -> Result<OlsFit> {
    let n = y.len();
    let p = x.ncols();

    if x.nrows() != n {
        return Err(FairStatsError::DimensionMismatch(format!(
            "X has {} rows but y has {} elements",
            x.nrows(),
            n
        )));
    }
    if p == 0 {
        return Err(FairStatsError::InvalidValue(
            "design matrix has no columns".to_string(),
        ));
    }
    if n == 0 {
        return Err(FairStatsError::InsufficientData("response is empty".to_string()));
    }

    if let Some(((row, col), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(FairStatsError::InvalidValue(format!(
            "design matrix has a missing or non-finite value at row {}, column {}",
            row, col
        )));
    }

    let x_nalg = to_dmatrix(x);

    let rank = numerical_rank(&x_nalg, config.rank_tolerance);
    if rank < p {
        return Err(FairStatsError::ModelFit(format!(
            "design matrix is rank deficient (rank {} < {} columns); \
             a predictor may be constant or collinear with the intercept",
            rank, p
        )));
    }

    if n <= p {
        return Err(FairStatsError::InsufficientData(format!(
            "{} observations leave no residual degrees of freedom for {} parameters",
            n, p
        )));
    }

    let xtx = x_nalg.transpose() * &x_nalg;
    let xty = x_nalg.transpose() * to_dvector(y);
    let (coefficients, covariance_unscaled) = solve_and_invert(&xtx, &xty).ok_or_else(|| {
        FairStatsError::ModelFit("normal equations are singular".to_string())
    })?;

    let residuals = y - &x.dot(&coefficients);
    let rss = residuals.dot(&residuals);
    let df_resid = (n - p) as f64;
    let sigma2 = rss / df_resid;

    let std_errors = covariance_unscaled.diag().mapv(|v| (sigma2 * v).sqrt());
    let t_values = Zip::from(&coefficients)
        .and(&std_errors)
        .map_collect(|&b, &se| b / se);
    let p_values = t_values.mapv(|t| pvalue_t(t, df_resid, Alternative::TwoSided));

    let y_mean = y.sum() / n as f64;
    let tss = y.mapv(|v| (v - y_mean).powi(2)).sum();
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };

    Ok(OlsFit {
        coefficients,
        std_errors,
        t_values,
        p_values,
        df_resid,
        rss,
        r_squared,
        covariance_unscaled,
    })
}
