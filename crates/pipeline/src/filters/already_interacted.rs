//! Filter to remove videos the user has already interacted with.
//!
//! Always part of the recommender's pipeline: an item with positive
//! strength in the user's row is never returned, whatever its score.

use crate::traits::Filter;
use crate::types::{RequestContext, ScoredItem};

/// Removes items present in `RequestContext::interacted`.
///
/// Uses the HashSet in the context for O(1) lookups.
pub struct AlreadyInteractedFilter;

impl Filter for AlreadyInteractedFilter {
    fn name(&self) -> &str {
        "AlreadyInteractedFilter"
    }

    fn apply(&self, candidates: Vec<ScoredItem>, context: &RequestContext) -> Vec<ScoredItem> {
        candidates
            .into_iter()
            .filter(|candidate| !context.interacted.contains(&candidate.item_idx))
            .collect()
    }
}
