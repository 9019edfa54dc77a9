//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use crate::types::{RequestContext, ScoredItem};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyInteractedFilter)
///     .add_filter(ExcludedItemsFilter);
///
/// let filtered = pipeline.apply(candidates, &context);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    pub fn apply(&self, candidates: Vec<ScoredItem>, context: &RequestContext) -> Vec<ScoredItem> {
        let mut current = candidates;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current, context);
            tracing::trace!(
                "Filter {} kept {} of {} items",
                filter.name(),
                current.len(),
                before
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{AlreadyInteractedFilter, ExcludedItemsFilter};

    fn candidates() -> Vec<ScoredItem> {
        vec![
            ScoredItem::new(0, 0.9),
            ScoredItem::new(1, 0.8),
            ScoredItem::new(2, 0.7),
        ]
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let mut context = RequestContext::new();
        context.interacted.insert(0);

        let filtered = pipeline.apply(candidates(), &context);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_filters_chain() {
        let mut context = RequestContext::new().with_excluded([2]);
        context.interacted.insert(0);

        let pipeline = FilterPipeline::new()
            .add_filter(AlreadyInteractedFilter)
            .add_filter(ExcludedItemsFilter);
        assert_eq!(
            pipeline.filter_names(),
            vec!["AlreadyInteractedFilter", "ExcludedItemsFilter"]
        );

        let filtered = pipeline.apply(candidates(), &context);
        assert_eq!(filtered, vec![ScoredItem::new(1, 0.8)]);
    }
}
