//! Dense latent-factor matrices produced by training.

use crate::config::AlsConfig;
use crate::error::{AlsError, Result};
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Upper bound of the uniform initial draw
const INIT_SCALE: f32 = 0.01;

/// User and item factor matrices plus the configuration that produced them.
///
/// `user_factors` is `num_users × factors`, `item_factors` is
/// `num_items × factors`. A store is never mutated once training has
/// returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorStore {
    user_factors: Array2<f32>,
    item_factors: Array2<f32>,
    config: AlsConfig,
}

impl FactorStore {
    /// Assemble a store from existing matrices, checking that both have
    /// `config.factors` columns.
    pub fn from_parts(
        user_factors: Array2<f32>,
        item_factors: Array2<f32>,
        config: AlsConfig,
    ) -> Result<Self> {
        let store = Self {
            user_factors,
            item_factors,
            config,
        };
        store.validate()?;
        Ok(store)
    }

    /// Check the configuration and that both matrices have
    /// `config.factors` columns. Used after deserializing.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if self.user_factors.ncols() != self.config.factors {
            return Err(AlsError::DimensionMismatch {
                what: "user factor columns",
                expected: self.config.factors,
                found: self.user_factors.ncols(),
            });
        }
        if self.item_factors.ncols() != self.config.factors {
            return Err(AlsError::DimensionMismatch {
                what: "item factor columns",
                expected: self.config.factors,
                found: self.item_factors.ncols(),
            });
        }
        Ok(())
    }

    /// Draw initial factors from a generator seeded with `config.seed`:
    /// all user rows first, then all item rows, uniform in `[0, 0.01)`.
    pub fn initialize(num_users: usize, num_items: usize, config: AlsConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let k = config.factors;
        let user_factors =
            Array2::from_shape_simple_fn((num_users, k), || rng.random::<f32>() * INIT_SCALE);
        let item_factors =
            Array2::from_shape_simple_fn((num_items, k), || rng.random::<f32>() * INIT_SCALE);
        Ok(Self {
            user_factors,
            item_factors,
            config,
        })
    }

    pub fn num_users(&self) -> usize {
        self.user_factors.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.item_factors.nrows()
    }

    pub fn factors(&self) -> usize {
        self.config.factors
    }

    pub fn config(&self) -> &AlsConfig {
        &self.config
    }

    pub fn user_factors(&self) -> &Array2<f32> {
        &self.user_factors
    }

    pub fn item_factors(&self) -> &Array2<f32> {
        &self.item_factors
    }

    pub fn user_vector(&self, user_idx: usize) -> Option<ArrayView1<'_, f32>> {
        (user_idx < self.num_users()).then(|| self.user_factors.row(user_idx))
    }

    pub fn item_vector(&self, item_idx: usize) -> Option<ArrayView1<'_, f32>> {
        (item_idx < self.num_items()).then(|| self.item_factors.row(item_idx))
    }

    /// Predicted affinity `U_u · V_i`
    pub fn score(&self, user_idx: usize, item_idx: usize) -> Option<f32> {
        Some(self.user_vector(user_idx)?.dot(&self.item_vector(item_idx)?))
    }

    /// Fail unless the store is shaped for a `num_users × num_items` matrix
    pub fn check_shape(&self, num_users: usize, num_items: usize) -> Result<()> {
        if self.num_users() != num_users {
            return Err(AlsError::DimensionMismatch {
                what: "users",
                expected: self.num_users(),
                found: num_users,
            });
        }
        if self.num_items() != num_items {
            return Err(AlsError::DimensionMismatch {
                what: "items",
                expected: self.num_items(),
                found: num_items,
            });
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Array2<f32>, Array2<f32>, AlsConfig) {
        (self.user_factors, self.item_factors, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_initialize_shape_and_range() {
        let store = FactorStore::initialize(3, 4, AlsConfig::default().with_factors(5)).unwrap();
        assert_eq!(store.user_factors().dim(), (3, 5));
        assert_eq!(store.item_factors().dim(), (4, 5));
        assert!(store
            .user_factors()
            .iter()
            .chain(store.item_factors().iter())
            .all(|&v| (0.0..INIT_SCALE).contains(&v)));
    }

    #[test]
    fn test_initialize_is_seeded() {
        let config = AlsConfig::default().with_seed(7);
        let a = FactorStore::initialize(4, 4, config.clone()).unwrap();
        let b = FactorStore::initialize(4, 4, config).unwrap();
        assert_eq!(a, b);

        let c = FactorStore::initialize(4, 4, AlsConfig::default().with_seed(8)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_score_and_bounds() {
        let config = AlsConfig::default().with_factors(2);
        let store = FactorStore::from_parts(
            array![[1.0, 2.0], [0.5, 0.0]],
            array![[3.0, 1.0], [0.0, 1.0], [1.0, 1.0]],
            config,
        )
        .unwrap();

        assert_eq!(store.score(0, 0), Some(5.0));
        assert_eq!(store.score(1, 2), Some(0.5));
        assert_eq!(store.score(2, 0), None);
        assert_eq!(store.score(0, 3), None);
    }

    #[test]
    fn test_from_parts_checks_factor_count() {
        let err = FactorStore::from_parts(
            Array2::zeros((2, 3)),
            Array2::zeros((2, 2)),
            AlsConfig::default().with_factors(2),
        )
        .unwrap_err();
        assert!(matches!(err, AlsError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_check_shape() {
        let store = FactorStore::initialize(3, 4, AlsConfig::default()).unwrap();
        assert!(store.check_shape(3, 4).is_ok());
        assert!(store.check_shape(4, 4).is_err());
        assert!(store.check_shape(3, 2).is_err());
    }
}
