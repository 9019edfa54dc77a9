//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to scored items.

use crate::types::{RequestContext, ScoredItem};

/// Core trait for filtering scored items.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// - `Send + Sync` lets a recommender holding filters be shared across threads
/// - Filters take ownership of the Vec<ScoredItem> and return a filtered Vec
/// - Filters only remove items; they never reorder or rescore
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of scored items.
    fn apply(&self, candidates: Vec<ScoredItem>, context: &RequestContext) -> Vec<ScoredItem>;
}
