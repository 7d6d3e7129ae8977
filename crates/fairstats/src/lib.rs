// =============================================================================
// fairstats Python Bindings
// =============================================================================
//
// Exposes the pure Rust code from `fairstats-core` as the Python module
// `fairstats._fairstats`.
//
// STRUCTURE:
// ----------
// - dataset_py:   the `Dataset` class and error mapping
// - measures_py:  the significance tests as free functions
//
// FOR MAINTAINERS:
// ----------------
// When adding a new measure:
// 1. Implement it in `fairstats-core` first
// 2. Add a `#[pyfunction]` wrapper in `measures_py.rs`
// 3. Register it in `_fairstats` at the bottom of this file
//
// =============================================================================

use pyo3::prelude::*;

mod dataset_py;
mod measures_py;

use dataset_py::PyDataset;
use measures_py::{
    fisher_exact_two_groups_py, regression_slope_test_py, significance_stars_py, t_test_ind_py,
    two_proportion_z_test_py,
};

// =============================================================================
// Module Registration
// =============================================================================

/// fairstats: significance tests for group fairness with a Rust backend
#[pymodule]
fn _fairstats(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDataset>()?;

    m.add_function(wrap_pyfunction!(t_test_ind_py, m)?)?;
    m.add_function(wrap_pyfunction!(fisher_exact_two_groups_py, m)?)?;
    m.add_function(wrap_pyfunction!(regression_slope_test_py, m)?)?;
    m.add_function(wrap_pyfunction!(two_proportion_z_test_py, m)?)?;
    m.add_function(wrap_pyfunction!(significance_stars_py, m)?)?;

    Ok(())
}
