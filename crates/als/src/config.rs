//! Training hyper-parameters.

use crate::error::{AlsError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for [`crate::AlsTrainer`].
///
/// Defaults match the values the production model was trained with:
/// 20 factors, regularization 0.1, 20 iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlsConfig {
    /// Number of latent factors per user and item
    pub factors: usize,
    /// Ridge penalty (lambda) applied to both factor matrices
    pub regularization: f32,
    /// Number of full (users, then items) sweeps
    pub iterations: usize,
    /// Confidence scaling: `c_ui = 1 + alpha * strength_ui`
    pub alpha: f32,
    /// Seed for the initial factor draw
    pub seed: u64,
    /// Compute and log the weighted objective after every iteration
    #[serde(default)]
    pub calculate_training_loss: bool,
}

impl Default for AlsConfig {
    fn default() -> Self {
        Self {
            factors: 20,
            regularization: 0.1,
            iterations: 20,
            alpha: 1.0,
            seed: 42,
            calculate_training_loss: false,
        }
    }
}

impl AlsConfig {
    pub fn new(factors: usize, regularization: f32, iterations: usize, alpha: f32) -> Self {
        Self {
            factors,
            regularization,
            iterations,
            alpha,
            ..Self::default()
        }
    }

    pub fn with_factors(mut self, factors: usize) -> Self {
        self.factors = factors;
        self
    }

    pub fn with_regularization(mut self, regularization: f32) -> Self {
        self.regularization = regularization;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_training_loss(mut self, enabled: bool) -> Self {
        self.calculate_training_loss = enabled;
        self
    }

    /// Check every field against its allowed range.
    ///
    /// `regularization == 0.0` passes: the caller accepts that a per-row
    /// system may turn out singular.
    pub fn validate(&self) -> Result<()> {
        if self.factors == 0 {
            return Err(AlsError::InvalidConfig("factors must be > 0".to_string()));
        }
        if self.iterations == 0 {
            return Err(AlsError::InvalidConfig(
                "iterations must be > 0".to_string(),
            ));
        }
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(AlsError::InvalidConfig(format!(
                "regularization must be a finite value >= 0, got {}",
                self.regularization
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(AlsError::InvalidConfig(format!(
                "alpha must be a finite value >= 0, got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Confidence weight for an observed strength, computed in f64
    pub fn confidence(&self, strength: f32) -> f64 {
        1.0 + f64::from(self.alpha) * f64::from(strength)
    }

    /// Fails with `InvalidConfig` when the confidence for `max_strength`
    /// does not fit in an f32.
    pub fn check_confidence(&self, max_strength: f32) -> Result<()> {
        let confidence = self.confidence(max_strength);
        if !confidence.is_finite() || confidence > f64::from(f32::MAX) {
            return Err(AlsError::InvalidConfig(format!(
                "alpha {} times strength {} overflows the confidence weight",
                self.alpha, max_strength
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AlsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.factors, 20);
        assert_eq!(config.iterations, 20);
    }

    #[test]
    fn test_rejects_zero_factors_and_iterations() {
        assert!(AlsConfig::default().with_factors(0).validate().is_err());
        assert!(AlsConfig::default().with_iterations(0).validate().is_err());
    }

    #[test]
    fn test_rejects_negative_or_nan_scalars() {
        assert!(AlsConfig::default().with_regularization(-0.1).validate().is_err());
        assert!(AlsConfig::default().with_alpha(f32::NAN).validate().is_err());
        assert!(AlsConfig::default().with_alpha(-1.0).validate().is_err());
    }

    #[test]
    fn test_zero_regularization_is_allowed() {
        assert!(AlsConfig::default().with_regularization(0.0).validate().is_ok());
    }

    #[test]
    fn test_confidence() {
        let config = AlsConfig::default().with_alpha(2.0);
        assert_eq!(config.confidence(0.0), 1.0);
        assert_eq!(config.confidence(3.0), 7.0);
    }

    #[test]
    fn test_confidence_does_not_overflow_f32() {
        let config = AlsConfig::default().with_alpha(1e30);
        let confidence = config.confidence(1e10);
        assert!(confidence.is_finite());
        assert!((confidence / 1e40 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_check_confidence() {
        let config = AlsConfig::default().with_alpha(1e30);
        assert!(config.check_confidence(1.0).is_ok());
        assert!(matches!(
            config.check_confidence(1e10),
            Err(AlsError::InvalidConfig(_))
        ));
        assert!(AlsConfig::default().check_confidence(f32::MAX).is_ok());
    }
}
