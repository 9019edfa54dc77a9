//! Error types for the als crate.
//!
//! Every constructor and solver in this crate fails fast: the first
//! violation found is returned and no partially built matrix or partially
//! trained factor store ever escapes.

use thiserror::Error;

/// Which side of the factorization an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    User,
    Item,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::User => write!(f, "user"),
            Axis::Item => write!(f, "item"),
        }
    }
}

/// Errors raised while building matrices, validating configuration or training
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlsError {
    /// A coordinate is outside the declared matrix shape
    #[error("{axis} index {index} out of range (dimension {bound})")]
    IndexOutOfRange {
        axis: Axis,
        index: usize,
        bound: usize,
    },

    /// Matrix and factor store disagree on a dimension
    #[error("dimension mismatch on {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A per-row normal-equations matrix is not positive definite.
    ///
    /// Only reachable with zero regularization.
    #[error("singular system while solving {axis} row {row}")]
    SingularSystem { axis: Axis, row: usize },

    /// The same (user, item) coordinate was supplied more than once
    #[error("duplicate interaction for user {user_idx}, item {item_idx}")]
    DuplicateInteraction { user_idx: usize, item_idx: usize },

    /// Strength is negative, NaN or infinite
    #[error("invalid strength {strength} for user {user_idx}, item {item_idx}")]
    InvalidStrength {
        user_idx: usize,
        item_idx: usize,
        strength: f32,
    },

    /// Hyper-parameters failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, AlsError>;
