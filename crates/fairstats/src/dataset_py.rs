// =============================================================================
// Dataset Python Bindings
// =============================================================================
//
// `fairstats.Dataset`: built from a dict of columns or a CSV file, with the
// two group queries the measures are based on.
// =============================================================================

use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use fairstats_core::dataset::{Column, Dataset};
use fairstats_core::FairStatsError;

/// Map core errors onto Python exceptions.
///
/// A missing column is a `KeyError`, as for a pandas lookup; everything else
/// is a `ValueError`.
pub(crate) fn to_py_err(err: FairStatsError) -> PyErr {
    match err {
        FairStatsError::ColumnNotFound(name) => PyKeyError::new_err(name),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Convert one Python column (numpy array or list) into a typed column.
fn column_from_py(name: String, values: &Bound<'_, PyAny>) -> PyResult<Column> {
    if let Ok(array) = values.extract::<PyReadonlyArray1<'_, i64>>() {
        return Ok(Column::int(name, array.as_array().to_vec()));
    }
    if let Ok(array) = values.extract::<PyReadonlyArray1<'_, f64>>() {
        return Ok(Column::float(name, array.as_array().to_vec()));
    }
    if let Ok(list) = values.extract::<Vec<i64>>() {
        return Ok(Column::int(name, list));
    }
    if let Ok(list) = values.extract::<Vec<f64>>() {
        return Ok(Column::float(name, list));
    }
    if let Ok(list) = values.extract::<Vec<String>>() {
        return Ok(Column::text(name, list));
    }
    Err(PyValueError::new_err(format!(
        "column '{}': expected a 1-D int64/float64 array or a list of numbers or strings",
        name
    )))
}

/// Read-only table of named columns.
///
/// Parameters
/// ----------
/// columns : dict[str, numpy.ndarray | list]
///     Column name → values. All columns must have the same length.
#[pyclass(name = "Dataset")]
pub struct PyDataset {
    pub(crate) inner: Dataset,
}

#[pymethods]
impl PyDataset {
    #[new]
    fn new(columns: &Bound<'_, PyDict>) -> PyResult<Self> {
        let mut parsed = Vec::with_capacity(columns.len());
        for (key, value) in columns.iter() {
            let name: String = key.extract()?;
            parsed.push(column_from_py(name, &value)?);
        }
        let inner = Dataset::new(parsed).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Load a dataset from a CSV file with a header row.
    #[staticmethod]
    fn from_csv(path: &str) -> PyResult<Self> {
        let inner = Dataset::from_csv_path(path).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn n_rows(&self) -> usize {
        self.inner.n_rows()
    }

    fn column_names(&self) -> Vec<String> {
        self.inner
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// All target values of rows whose protected value equals `group_value`.
    ///
    /// Returns
    /// -------
    /// numpy.ndarray
    ///     Target values in table order (possibly empty)
    fn get_all_targets_of_group<'py>(
        &self,
        py: Python<'py>,
        target_col: &str,
        protected_col: &str,
        group_value: f64,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let values = self
            .inner
            .get_all_targets_of_group(target_col, protected_col, group_value)
            .map_err(to_py_err)?;
        Ok(values.into_pyarray_bound(py))
    }

    /// Count rows of one group with an accepted (1) or rejected (0) outcome.
    #[pyo3(signature = (target_col, protected_col, group, accepted))]
    fn count_classification_and_category(
        &self,
        target_col: &str,
        protected_col: &str,
        group: f64,
        accepted: i64,
    ) -> PyResult<usize> {
        self.inner
            .count_classification_and_category(target_col, protected_col, group, accepted != 0)
            .map_err(to_py_err)
    }

    fn __len__(&self) -> usize {
        self.inner.n_rows()
    }

    fn __repr__(&self) -> String {
        format!(
            "Dataset(n_rows={}, columns={:?})",
            self.inner.n_rows(),
            self.inner.column_names()
        )
    }
}
