//! Train/test split for offline evaluation.

use crate::error::{DataLoadError, Result};
use als::Interaction;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

/// Interactions partitioned into a training set and a held-out set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldoutSplit {
    pub train: Vec<Interaction>,
    pub test: Vec<Interaction>,
}

/// Randomly hold out about `test_ratio` of the interactions.
///
/// The shuffle is seeded, so a given input, ratio and seed always produce
/// the same split. A user is never left without a training interaction, so
/// users with a single interaction stay entirely in `train`. Both halves
/// keep the input's relative order.
pub fn holdout_split(interactions: &[Interaction], test_ratio: f64, seed: u64) -> Result<HoldoutSplit> {
    if !(0.0..1.0).contains(&test_ratio) {
        return Err(DataLoadError::InvalidValue {
            field: "test_ratio".to_string(),
            value: test_ratio.to_string(),
        });
    }

    let target = (interactions.len() as f64 * test_ratio).round() as usize;
    let mut remaining: HashMap<usize, usize> = HashMap::new();
    for it in interactions {
        *remaining.entry(it.user_idx).or_insert(0) += 1;
    }

    let mut order: Vec<usize> = (0..interactions.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut held_out = vec![false; interactions.len()];
    let mut taken = 0;
    for pos in order {
        if taken == target {
            break;
        }
        let user = interactions[pos].user_idx;
        let left = remaining.entry(user).or_insert(0);
        if *left > 1 {
            *left -= 1;
            held_out[pos] = true;
            taken += 1;
        }
    }

    let mut split = HoldoutSplit::default();
    for (it, test) in interactions.iter().zip(held_out) {
        if test {
            split.test.push(*it);
        } else {
            split.train.push(*it);
        }
    }
    Ok(split)
}
