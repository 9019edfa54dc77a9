//! Types shared by the scoring, filtering and ranking stages.

use als::RowView;
use std::collections::HashSet;

/// An item with its latent-factor score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem {
    pub item_idx: usize,
    pub score: f32,
}

impl ScoredItem {
    pub fn new(item_idx: usize, score: f32) -> Self {
        Self { item_idx, score }
    }
}

/// What the filters need to know about one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Items with a positive strength in the requesting user's row
    pub interacted: HashSet<usize>,
    /// Items the caller asked to leave out
    pub excluded: HashSet<usize>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a user whose interaction row is `row`
    pub fn from_row(row: RowView<'_>) -> Self {
        Self {
            interacted: row
                .iter()
                .filter(|&(_, strength)| strength > 0.0)
                .map(|(item_idx, _)| item_idx)
                .collect(),
            excluded: HashSet::new(),
        }
    }

    /// Add caller-supplied exclusions (builder pattern)
    pub fn with_excluded(mut self, items: impl IntoIterator<Item = usize>) -> Self {
        self.excluded.extend(items);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_row() {
        let indices = [1, 4, 6];
        let values = [2.0, 0.0, 0.5];
        let context = RequestContext::from_row(RowView::new(&indices, &values));

        assert!(context.interacted.contains(&1));
        assert!(context.interacted.contains(&6));
        // stored zero is not an interaction
        assert!(!context.interacted.contains(&4));
        assert!(context.excluded.is_empty());
    }

    #[test]
    fn test_with_excluded() {
        let context = RequestContext::new().with_excluded([3, 9]);
        assert_eq!(context.excluded.len(), 2);
        assert!(context.interacted.is_empty());
    }
}
