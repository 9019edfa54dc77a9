//! Ordering and top-K selection.
//!
//! Items are ordered by descending score, ties by ascending item index.
//! `-0.0` ranks equal to `0.0` and NaN ranks below every number.

use crate::types::ScoredItem;
use std::cmp::Ordering;

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        // folds -0.0 into 0.0
        score + 0.0
    }
}

/// Total order used for every ranked result
pub fn compare(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    rank_key(b.score)
        .total_cmp(&rank_key(a.score))
        .then_with(|| a.item_idx.cmp(&b.item_idx))
}

/// Keep the `k` best candidates, in ranked order.
///
/// Returns every candidate when fewer than `k` are given.
pub fn top_k(mut candidates: Vec<ScoredItem>, k: usize) -> Vec<ScoredItem> {
    if k == 0 {
        return Vec::new();
    }
    if k < candidates.len() {
        candidates.select_nth_unstable_by(k - 1, compare);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(compare);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(scores: &[f32]) -> Vec<ScoredItem> {
        scores
            .iter()
            .enumerate()
            .map(|(idx, &score)| ScoredItem::new(idx, score))
            .collect()
    }

    fn indices(ranked: &[ScoredItem]) -> Vec<usize> {
        ranked.iter().map(|s| s.item_idx).collect()
    }

    #[test]
    fn test_descending_by_score() {
        let ranked = top_k(items(&[0.1, 0.9, 0.5, -0.3]), 10);
        assert_eq!(indices(&ranked), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_ties_break_by_ascending_index() {
        let ranked = top_k(items(&[0.5, 0.7, 0.5, 0.7, 0.5]), 4);
        assert_eq!(indices(&ranked), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let ranked = top_k(items(&[-0.0, 0.0, -0.0]), 3);
        assert_eq!(indices(&ranked), vec![0, 1, 2]);
    }

    #[test]
    fn test_nan_ranks_last() {
        let ranked = top_k(items(&[f32::NAN, -5.0, 1.0]), 3);
        assert_eq!(indices(&ranked), vec![2, 1, 0]);
    }

    #[test]
    fn test_truncation() {
        assert!(top_k(items(&[1.0, 2.0]), 0).is_empty());
        assert_eq!(top_k(items(&[1.0, 2.0, 3.0]), 2).len(), 2);
        assert_eq!(top_k(Vec::new(), 5).len(), 0);
    }

    #[test]
    fn test_partial_selection_matches_full_sort() {
        let scores: Vec<f32> = (0..50).map(|i| ((i * 37) % 11) as f32 / 3.0).collect();
        let mut full = items(&scores);
        full.sort_by(compare);
        for k in [1, 5, 11, 49, 50] {
            assert_eq!(top_k(items(&scores), k), full[..k].to_vec());
        }
    }
}
