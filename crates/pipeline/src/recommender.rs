//! Top-K recommendation against a trained factor store.
//!
//! ## Algorithm
//! 1. Score every item: `score_i = U_user · V_i`
//! 2. Run the filter pipeline (already-interacted items, caller exclusions)
//! 3. Rank by descending score, ties by ascending item index
//! 4. Keep at most `k`
//!
//! The store is shared read-only, so any number of requests may run
//! concurrently against one `Recommender`.

use crate::error::{RecommendError, Result};
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{AlreadyInteractedFilter, ExcludedItemsFilter};
use crate::ranking::top_k;
use crate::types::{RequestContext, ScoredItem};
use als::{FactorStore, RowView};
use ndarray::Array1;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Scores, filters and ranks items for users of one factor store
pub struct Recommender {
    store: Arc<FactorStore>,
    filters: FilterPipeline,
}

impl Recommender {
    /// Create a recommender with the standard filter pipeline
    pub fn new(store: Arc<FactorStore>) -> Self {
        let filters = FilterPipeline::new()
            .add_filter(AlreadyInteractedFilter)
            .add_filter(ExcludedItemsFilter);
        Self { store, filters }
    }

    pub fn store(&self) -> &Arc<FactorStore> {
        &self.store
    }

    pub fn num_users(&self) -> usize {
        self.store.num_users()
    }

    pub fn num_items(&self) -> usize {
        self.store.num_items()
    }

    /// Up to `k` items for `user_idx`, excluding every item with positive
    /// strength in `user_row`.
    ///
    /// Returns `min(k, num_items - interacted)` entries; an empty list is a
    /// valid answer, not an error.
    pub fn recommend(&self, user_idx: usize, user_row: RowView<'_>, k: usize) -> Result<Vec<ScoredItem>> {
        self.recommend_excluding(user_idx, user_row, k, std::iter::empty())
    }

    /// Like [`Recommender::recommend`], also dropping `excluded` items
    #[instrument(skip(self, user_row, excluded), fields(interacted = user_row.nnz()))]
    pub fn recommend_excluding(
        &self,
        user_idx: usize,
        user_row: RowView<'_>,
        k: usize,
        excluded: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<ScoredItem>> {
        let scores = self.score_items(user_idx)?;
        let context = RequestContext::from_row(user_row).with_excluded(excluded);

        let candidates: Vec<ScoredItem> = scores
            .iter()
            .enumerate()
            .map(|(item_idx, &score)| ScoredItem::new(item_idx, score))
            .collect();
        let filtered = self.filters.apply(candidates, &context);
        let ranked = top_k(filtered, k);

        debug!("Returning {} recommendations", ranked.len());
        Ok(ranked)
    }

    /// Raw scores `U_user · V_i` for every item, in item order
    pub fn score_items(&self, user_idx: usize) -> Result<Array1<f32>> {
        let user = self
            .store
            .user_vector(user_idx)
            .ok_or(RecommendError::UnknownUser {
                user_idx,
                num_users: self.store.num_users(),
            })?;
        Ok(self.store.item_factors().dot(&user))
    }

    /// Up to `k` items most similar to `item_idx` by cosine similarity of
    /// their factor vectors. The item itself is never returned.
    #[instrument(skip(self))]
    pub fn similar_items(&self, item_idx: usize, k: usize) -> Result<Vec<ScoredItem>> {
        let target = self
            .store
            .item_vector(item_idx)
            .ok_or(RecommendError::UnknownItem {
                item_idx,
                num_items: self.store.num_items(),
            })?;

        let items = self.store.item_factors();
        let norms: Array1<f32> = items
            .rows()
            .into_iter()
            .map(|row| row.dot(&row).sqrt())
            .collect();
        let target_norm = norms[item_idx];
        let dots = items.dot(&target);

        let candidates: Vec<ScoredItem> = dots
            .iter()
            .zip(norms.iter())
            .enumerate()
            .map(|(idx, (&dot, &norm))| {
                let denom = norm * target_norm;
                let similarity = if denom > 0.0 { dot / denom } else { 0.0 };
                ScoredItem::new(idx, similarity)
            })
            .collect();

        let context = RequestContext::new().with_excluded([item_idx]);
        Ok(top_k(self.filters.apply(candidates, &context), k))
    }
}
