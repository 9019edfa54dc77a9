//! Offline ranking metrics against held-out interactions.

use crate::error::Result;
use crate::recommender::Recommender;
use als::{Interaction, InteractionMatrix, RowView};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;
use tracing::info;

/// Fraction of the first `k` recommendations that are relevant.
///
/// The denominator is `k` even when fewer than `k` items were recommended.
/// Returns 0.0 for `k == 0`.
pub fn precision_at_k<T: Eq + Hash>(recommended: &[T], relevant: &HashSet<T>, k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    hits(recommended, relevant, k) as f64 / k as f64
}

/// Fraction of the relevant items found in the first `k` recommendations.
///
/// Returns 0.0 when nothing is relevant.
pub fn recall_at_k<T: Eq + Hash>(recommended: &[T], relevant: &HashSet<T>, k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    hits(recommended, relevant, k) as f64 / relevant.len() as f64
}

fn hits<T: Eq + Hash>(recommended: &[T], relevant: &HashSet<T>, k: usize) -> usize {
    let mut seen = HashSet::new();
    recommended
        .iter()
        .take(k)
        .filter(|item| relevant.contains(*item) && seen.insert(*item))
        .count()
}

/// Mean precision and recall over the evaluated users
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvaluationReport {
    pub k: usize,
    pub users_evaluated: usize,
    pub precision: f64,
    pub recall: f64,
}

/// Score the recommender against a held-out set.
///
/// Every user with at least one held-out interaction is evaluated: the
/// recommender sees that user's `train` row, and the held-out items are the
/// relevant set. Users unknown to the recommender count as empty lists.
pub fn evaluate(
    recommender: &Recommender,
    train: &InteractionMatrix,
    test: &[Interaction],
    k: usize,
) -> Result<EvaluationReport> {
    let mut relevant: BTreeMap<usize, HashSet<usize>> = BTreeMap::new();
    for it in test.iter().filter(|it| it.strength > 0.0) {
        relevant.entry(it.user_idx).or_default().insert(it.item_idx);
    }
    let users: Vec<(usize, HashSet<usize>)> = relevant.into_iter().collect();

    let per_user: Vec<(f64, f64)> = users
        .par_iter()
        .map(|(user_idx, relevant)| -> Result<(f64, f64)> {
            if *user_idx >= recommender.num_users() {
                return Ok((0.0, 0.0));
            }
            let row = train.row(*user_idx).unwrap_or(RowView::empty());
            let ranked: Vec<usize> = recommender
                .recommend(*user_idx, row, k)?
                .into_iter()
                .map(|s| s.item_idx)
                .collect();
            Ok((
                precision_at_k(&ranked, relevant, k),
                recall_at_k(&ranked, relevant, k),
            ))
        })
        .collect::<Result<_>>()?;

    let mut report = EvaluationReport {
        k,
        users_evaluated: per_user.len(),
        ..Default::default()
    };
    if report.users_evaluated > 0 {
        let n = report.users_evaluated as f64;
        report.precision = per_user.iter().map(|(p, _)| p).sum::<f64>() / n;
        report.recall = per_user.iter().map(|(_, r)| r).sum::<f64>() / n;
    }

    info!(
        "Evaluated {} users at k={}: precision={:.4} recall={:.4}",
        report.users_evaluated, k, report.precision, report.recall
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use als::{AlsConfig, FactorStore};
    use ndarray::array;
    use std::sync::Arc;

    fn set(items: &[usize]) -> HashSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_precision_at_k() {
        assert_eq!(precision_at_k(&[1, 2, 3, 4], &set(&[2, 4, 9]), 4), 0.5);
        assert_eq!(precision_at_k(&[1, 2], &set(&[2]), 4), 0.25);
        assert_eq!(precision_at_k(&[1, 2], &set(&[2]), 0), 0.0);
        assert_eq!(precision_at_k(&[2, 2], &set(&[2]), 2), 0.5);
    }

    #[test]
    fn test_recall_at_k() {
        assert_eq!(recall_at_k(&[1, 2, 3, 4], &set(&[2, 4, 9, 10]), 4), 0.5);
        assert_eq!(recall_at_k(&[1, 2, 3, 4], &set(&[4]), 3), 0.0);
        assert_eq!(recall_at_k(&[1, 2], &set(&[]), 2), 0.0);
    }

    #[test]
    fn test_string_keys() {
        let relevant: HashSet<&str> = ["v003"].into_iter().collect();
        assert_eq!(precision_at_k(&["v001", "v003"], &relevant, 2), 0.5);
        assert_eq!(recall_at_k(&["v001", "v003"], &relevant, 2), 1.0);
    }

    #[test]
    fn test_evaluate_averages_over_users_with_held_out_items() {
        // user 0 scores items [3, 2, 1], user 1 scores them [-3, -2, -1]
        let store = FactorStore::from_parts(
            array![[1.0], [-1.0], [1.0]],
            array![[3.0], [2.0], [1.0]],
            AlsConfig::default().with_factors(1),
        )
        .unwrap();
        let recommender = Recommender::new(Arc::new(store));
        let train = InteractionMatrix::from_interactions(
            3,
            3,
            &[Interaction::new(0, 0, 1.0), Interaction::new(1, 2, 1.0)],
        )
        .unwrap();
        // user 0 ranks [1, 2], user 1 ranks [1, 0]; user 2 has nothing held out
        let test = [Interaction::new(0, 1, 1.0), Interaction::new(1, 0, 1.0)];

        let report = evaluate(&recommender, &train, &test, 1).unwrap();
        assert_eq!(report.users_evaluated, 2);
        assert_eq!(report.precision, 0.5);
        assert_eq!(report.recall, 0.5);
    }

    #[test]
    fn test_evaluate_empty_test_set() {
        let store = FactorStore::initialize(2, 2, AlsConfig::default()).unwrap();
        let recommender = Recommender::new(Arc::new(store));
        let train = InteractionMatrix::from_interactions(2, 2, &[]).unwrap();

        let report = evaluate(&recommender, &train, &[], 5).unwrap();
        assert_eq!(report.users_evaluated, 0);
        assert_eq!(report.precision, 0.0);
    }
}
