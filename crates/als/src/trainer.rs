//! Implicit-feedback alternating least squares.
//!
//! ## Algorithm
//! Minimizes
//!
//! ```text
//! L = Σ_(u,i) c_ui (p_ui − U_u·V_i)² + λ(‖U‖² + ‖V‖²)
//! ```
//!
//! with `p_ui = 1` for stored entries, `0` elsewhere, and
//! `c_ui = 1 + α·strength_ui`. Each iteration runs two half-steps:
//! 1. Fix V, solve every user row
//! 2. Fix U, solve every item row (over the transposed matrix)
//!
//! A row solve uses the Gram matrix `VᵀV`, computed once per half-step, so
//! its cost is proportional to the row's stored entries:
//!
//! ```text
//! A = VᵀV + Σ_{i∈I_u} (c_ui − 1) v_i v_iᵀ + λI
//! b = Σ_{i∈I_u} c_ui v_i
//! ```
//!
//! Rows within a half-step are independent and solved on the rayon pool.
//! A half-step only replaces its factor matrix after every row has been
//! solved, so the next half-step never sees a partial update.

use crate::config::AlsConfig;
use crate::error::{AlsError, Axis, Result};
use crate::factors::FactorStore;
use crate::linalg::cholesky_solve;
use crate::matrix::{InteractionMatrix, RowView};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Fits a [`FactorStore`] to an [`InteractionMatrix`].
#[derive(Debug, Clone)]
pub struct AlsTrainer {
    config: AlsConfig,
}

impl AlsTrainer {
    /// Create a trainer, validating the configuration up front
    pub fn new(config: AlsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AlsConfig {
        &self.config
    }

    /// Train from a freshly seeded initialization.
    ///
    /// Identical input and configuration always produce an identical store.
    pub fn fit(&self, matrix: &InteractionMatrix) -> Result<FactorStore> {
        let store = FactorStore::initialize(matrix.num_rows(), matrix.num_cols(), self.config.clone())?;
        self.fit_from(store, matrix)
    }

    /// Continue training from `store`.
    ///
    /// Fails with `DimensionMismatch` when the store is not shaped for
    /// `matrix` or was built with a different factor count.
    #[instrument(skip_all, fields(users = matrix.num_rows(), items = matrix.num_cols(), nnz = matrix.nnz()))]
    pub fn fit_from(&self, store: FactorStore, matrix: &InteractionMatrix) -> Result<FactorStore> {
        store.check_shape(matrix.num_rows(), matrix.num_cols())?;
        if store.factors() != self.config.factors {
            return Err(AlsError::DimensionMismatch {
                what: "factors",
                expected: self.config.factors,
                found: store.factors(),
            });
        }
        let max_strength = matrix
            .rows()
            .flat_map(|row| row.values().iter().copied())
            .fold(0.0f32, f32::max);
        self.config.check_confidence(max_strength)?;
        if self.config.regularization == 0.0 {
            warn!("Training with regularization 0: per-row systems may be singular");
        }

        let start = Instant::now();
        let item_user = matrix.transpose();
        let (mut user_factors, mut item_factors, _) = store.into_parts();

        for iteration in 0..self.config.iterations {
            user_factors = solve_half_step(matrix, &item_factors, &self.config, Axis::User)?;
            item_factors = solve_half_step(&item_user, &user_factors, &self.config, Axis::Item)?;

            if self.config.calculate_training_loss {
                let loss = weighted_loss(matrix, &user_factors, &item_factors, &self.config);
                debug!("ALS iteration {}: loss = {:.6}", iteration + 1, loss);
            }
        }

        info!(
            "Trained {} factors over {} iterations in {:.2?}",
            self.config.factors,
            self.config.iterations,
            start.elapsed()
        );

        FactorStore::from_parts(user_factors, item_factors, self.config.clone())
    }
}

/// The full weighted, regularized objective for `store` on `matrix`,
/// using the store's own configuration for alpha and lambda.
pub fn training_loss(matrix: &InteractionMatrix, store: &FactorStore) -> Result<f64> {
    store.check_shape(matrix.num_rows(), matrix.num_cols())?;
    Ok(weighted_loss(
        matrix,
        store.user_factors(),
        store.item_factors(),
        store.config(),
    ))
}

/// Gram matrix `XᵀX` in f64
fn gram(factors: &Array2<f32>) -> Array2<f64> {
    let x = factors.mapv(f64::from);
    x.t().dot(&x)
}

/// Solve every row of `matrix` against the fixed factors of the other side.
fn solve_half_step(
    matrix: &InteractionMatrix,
    fixed: &Array2<f32>,
    config: &AlsConfig,
    axis: Axis,
) -> Result<Array2<f32>> {
    let k = config.factors;
    let yty = gram(fixed);
    let rows: Vec<RowView<'_>> = matrix.rows().collect();

    let solved: Vec<Option<Array1<f64>>> = rows
        .par_iter()
        .map(|row| solve_row(*row, fixed, &yty, config))
        .collect();

    let mut out = Array2::<f32>::zeros((matrix.num_rows(), k));
    for (r, x) in solved.into_iter().enumerate() {
        let x = x.ok_or(AlsError::SingularSystem { axis, row: r })?;
        out.row_mut(r).assign(&x.mapv(|v| v as f32));
    }
    Ok(out)
}

/// Regularized weighted least squares for one row.
///
/// A row with no entries has right-hand side 0, so its solution is the
/// zero vector; it is returned directly.
fn solve_row(
    row: RowView<'_>,
    fixed: &Array2<f32>,
    yty: &Array2<f64>,
    config: &AlsConfig,
) -> Option<Array1<f64>> {
    let k = config.factors;
    if row.is_empty() {
        return Some(Array1::zeros(k));
    }

    let mut a = yty.clone();
    let mut b = Array1::<f64>::zeros(k);
    for (col, strength) in row.iter() {
        let y = fixed.row(col);
        let confidence = config.confidence(strength);
        for i in 0..k {
            let yi = f64::from(y[i]);
            b[i] += confidence * yi;
            let scaled = (confidence - 1.0) * yi;
            for j in 0..k {
                a[[i, j]] += scaled * f64::from(y[j]);
            }
        }
    }

    let lambda = f64::from(config.regularization);
    for i in 0..k {
        a[[i, i]] += lambda;
    }

    cholesky_solve(&a, &b, lambda)
}

/// Expands the sum over every cell as
/// `Σ_u x_uᵀ(VᵀV)x_u + Σ_stored [(c − 1)x² − 2cx + c]`
/// so unobserved cells never have to be visited.
fn weighted_loss(
    matrix: &InteractionMatrix,
    user_factors: &Array2<f32>,
    item_factors: &Array2<f32>,
    config: &AlsConfig,
) -> f64 {
    let v = item_factors.mapv(f64::from);
    let vtv = v.t().dot(&v);

    let mut loss = 0.0;
    for (u, row) in matrix.rows().enumerate() {
        let x = user_factors.row(u).mapv(f64::from);
        loss += x.dot(&vtv.dot(&x));
        for (i, strength) in row.iter() {
            let c = config.confidence(strength);
            let prediction = x.dot(&v.row(i));
            loss += (c - 1.0) * prediction * prediction - 2.0 * c * prediction + c;
        }
    }

    let lambda = f64::from(config.regularization);
    let norms: f64 = user_factors
        .iter()
        .chain(item_factors.iter())
        .map(|&w| f64::from(w) * f64::from(w))
        .sum();
    loss + lambda * norms
}
