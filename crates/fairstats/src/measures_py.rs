// =============================================================================
// Fairness Measure Python Bindings
// =============================================================================
//
// The four significance tests, with the same call shape as the core:
// (dataset, target_col, protected_col, ...).
// =============================================================================

use pyo3::prelude::*;

use fairstats_core::inference::significance_stars;
use fairstats_core::measures;

use crate::dataset_py::{to_py_err, PyDataset};

/// Independent two-sample t-test between protected (== 1) and
/// non-protected (== 0) rows.
///
/// Parameters
/// ----------
/// dataset : Dataset
/// target_col : str
///     Column with the classifier results
/// protected_col : str
///     Column with the protection status
/// equal_var : bool
///     True: Student's test; False (default): Welch's test
///
/// Returns
/// -------
/// tuple[float, float]
///     (t-statistic, two-tailed p-value)
#[pyfunction]
#[pyo3(name = "t_test_ind", signature = (dataset, target_col, protected_col, equal_var=false))]
pub fn t_test_ind_py(
    dataset: PyRef<'_, PyDataset>,
    target_col: &str,
    protected_col: &str,
    equal_var: bool,
) -> PyResult<(f64, f64)> {
    measures::t_test_ind(&dataset.inner, target_col, protected_col, equal_var).map_err(to_py_err)
}

/// Fisher's exact test on the 2×2 acceptance table.
///
/// Returns
/// -------
/// tuple[float, float]
///     (odds ratio, p-value)
#[pyfunction]
#[pyo3(name = "fisher_exact_two_groups")]
pub fn fisher_exact_two_groups_py(
    dataset: PyRef<'_, PyDataset>,
    target_col: &str,
    protected_col: &str,
) -> PyResult<(f64, f64)> {
    measures::fisher_exact_two_groups(&dataset.inner, target_col, protected_col)
        .map_err(to_py_err)
}

/// t-statistic of the protected column in OLS `target ~ 1 + protected`.
#[pyfunction]
#[pyo3(name = "regression_slope_test")]
pub fn regression_slope_test_py(
    dataset: PyRef<'_, PyDataset>,
    target_col: &str,
    protected_col: &str,
) -> PyResult<f64> {
    measures::regression_slope_test(&dataset.inner, target_col, protected_col).map_err(to_py_err)
}

/// Two-proportion z-test of acceptance rates, protected == 0 vs != 0.
///
/// Returns
/// -------
/// tuple[float, float]
///     (z-score, p-value)
#[pyfunction]
#[pyo3(name = "two_proportion_z_test")]
pub fn two_proportion_z_test_py(
    dataset: PyRef<'_, PyDataset>,
    target_col: &str,
    protected_col: &str,
) -> PyResult<(f64, f64)> {
    measures::two_proportion_z_test(&dataset.inner, target_col, protected_col).map_err(to_py_err)
}

/// Significance stars for a p-value ("***", "**", "*", "." or "").
#[pyfunction]
#[pyo3(name = "significance_stars")]
pub fn significance_stars_py(pvalue: f64) -> &'static str {
    significance_stars(pvalue)
}
