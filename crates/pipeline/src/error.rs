//! Error types for the pipeline crate.

use thiserror::Error;

/// Errors returned by the recommender.
///
/// Both variants are lookup misses on a valid store; they are the only
/// failures a request can produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// User index is outside `[0, num_users)`
    #[error("unknown user index {user_idx} (store has {num_users} users)")]
    UnknownUser { user_idx: usize, num_users: usize },

    /// Item index is outside `[0, num_items)`
    #[error("unknown item index {item_idx} (store has {num_items} items)")]
    UnknownItem { item_idx: usize, num_items: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
