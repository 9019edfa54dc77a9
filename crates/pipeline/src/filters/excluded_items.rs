//! Filter to drop items the caller explicitly excluded.

use crate::traits::Filter;
use crate::types::{RequestContext, ScoredItem};

/// Removes items present in `RequestContext::excluded`.
pub struct ExcludedItemsFilter;

impl Filter for ExcludedItemsFilter {
    fn name(&self) -> &str {
        "ExcludedItemsFilter"
    }

    fn apply(&self, candidates: Vec<ScoredItem>, context: &RequestContext) -> Vec<ScoredItem> {
        if context.excluded.is_empty() {
            return candidates;
        }
        candidates
            .into_iter()
            .filter(|candidate| !context.excluded.contains(&candidate.item_idx))
            .collect()
    }
}
