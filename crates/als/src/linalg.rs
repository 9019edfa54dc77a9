//! Dense solve for the small (factors × factors) normal equations.

use ndarray::{Array1, Array2};

/// Pivots at or below this fraction of the largest diagonal entry are
/// treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Solve `A x = b` for symmetric positive-definite `A` via Cholesky
/// factorization `A = L Lᵀ`.
///
/// `ridge` is the λ already added to the diagonal of a positive
/// semi-definite matrix. When it is positive every exact pivot is at least
/// `ridge`, so pivots above `ridge / 2` are accepted however large the
/// diagonal grows.
///
/// Returns `None` when `A` is not (numerically) positive definite.
pub(crate) fn cholesky_solve(
    a: &Array2<f64>,
    b: &Array1<f64>,
    ridge: f64,
) -> Option<Array1<f64>> {
    let n = a.nrows();
    debug_assert_eq!(a.ncols(), n);
    debug_assert_eq!(b.len(), n);

    let max_diag = a.diag().iter().fold(0.0f64, |m, &v| m.max(v.abs()));
    let mut tolerance = PIVOT_TOLERANCE * max_diag;
    if ridge > 0.0 {
        tolerance = tolerance.min(0.5 * ridge);
    }

    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let pivot = a[[i, i]] - sum;
                if !pivot.is_finite() || pivot <= tolerance {
                    return None;
                }
                l[[i, j]] = pivot.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Lᵀ x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}
