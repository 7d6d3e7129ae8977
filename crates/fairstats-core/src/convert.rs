// =============================================================================
// ndarray ↔ nalgebra Conversion Utilities
// =============================================================================
//
// Columns and design matrices live in ndarray; the decompositions used by the
// OLS backend (SVD for the rank check, Cholesky/LU for the normal equations)
// live in nalgebra. All crossings between the two go through this module.
//
// =============================================================================

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Convert an ndarray Array2 to a nalgebra DMatrix.
///
/// Works for any memory layout since elements are read by index.
#[inline]
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Convert an ndarray Array1 to a nalgebra DVector.
#[inline]
pub fn to_dvector(v: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().copied())
}

/// Convert a nalgebra DMatrix to an ndarray Array2.
#[inline]
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn(m.shape(), |(i, j)| m[(i, j)])
}

/// Convert a nalgebra DVector to an ndarray Array1.
#[inline]
pub fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    v.iter().copied().collect()
}

/// Solve Ax = b and also return A⁻¹, for symmetric A (e.g. X'X).
///
/// Cholesky first; LU when A is not numerically positive definite.
/// Returns (solution, inverse) or None if A is singular.
pub fn solve_and_invert(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<(Array1<f64>, Array2<f64>)> {
    let p = a.nrows();
    if let Some(chol) = a.clone().cholesky() {
        let solution = chol.solve(b);
        let inverse = chol.solve(&DMatrix::identity(p, p));
        // A zero pivot on a singular PSD matrix slips through as inf/NaN
        if solution.iter().chain(inverse.iter()).all(|v| v.is_finite()) {
            return Some((to_array1(&solution), to_array2(&inverse)));
        }
    }

    let lu = a.clone().lu();
    let solution = lu.solve(b)?;
    let inverse = lu.try_inverse()?;
    Some((to_array1(&solution), to_array2(&inverse)))
}

/// Numerical rank of a matrix from its singular values.
///
/// A singular value counts when it exceeds `rel_tol` times the largest one.
/// A matrix with a non-finite entry has rank 0.
pub fn numerical_rank(m: &DMatrix<f64>, rel_tol: f64) -> usize {
    if m.nrows() == 0 || m.ncols() == 0 || m.iter().any(|v| !v.is_finite()) {
        return 0;
    }
    let singular_values = m.clone().svd(false, false).singular_values;
    let largest = singular_values.max();
    if !(largest > 0.0) {
        return 0;
    }
    singular_values.iter().filter(|&&s| s > rel_tol * largest).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_roundtrip_matrix() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = to_dmatrix(&a);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(to_array2(&m), a);
    }

    #[test]
    fn test_transposed_view_is_read_by_index() {
        let a = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let t = a.t().to_owned();
        let m = to_dmatrix(&t);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 2)], 5.0);
    }

    #[test]
    fn test_solve_and_invert() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_row_slice(&[5.0, 4.0]);
        let (sol, inv) = solve_and_invert(&a, &b).unwrap();
        assert!((4.0 * sol[0] + sol[1] - 5.0).abs() < 1e-10);
        assert!((sol[0] + 3.0 * sol[1] - 4.0).abs() < 1e-10);
        assert!((inv[[0, 0]] * 4.0 + inv[[0, 1]] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_solve_and_invert_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_and_invert(&a, &b).is_none());
    }

    #[test]
    fn test_numerical_rank() {
        let full = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        assert_eq!(numerical_rank(&full, 1e-10), 2);

        // Constant second column duplicates the intercept
        let deficient = DMatrix::from_row_slice(3, 2, &[1.0, 5.0, 1.0, 5.0, 1.0, 5.0]);
        assert_eq!(numerical_rank(&deficient, 1e-10), 1);

        assert_eq!(numerical_rank(&DMatrix::zeros(3, 2), 1e-10), 0);

        let missing = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, f64::NAN, 1.0, 2.0]);
        assert_eq!(numerical_rank(&missing, 1e-10), 0);
    }
}
