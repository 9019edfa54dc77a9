//! InteractionDataset building: aggregation and indexing.
//!
//! Raw events are summed per (user, video) pair so that the matrix builder
//! sees at most one record per coordinate. Aggregated records are ordered
//! by (user key, video key) and indices are handed out in first-seen order
//! over that sequence.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use als::{Interaction, InteractionMatrix};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

impl InteractionDataset {
    /// Parse and aggregate an interactions CSV file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading interactions from {:?}", path);
        let raw = parser::parse_interactions(path)?;
        let dataset = Self::from_raw(raw)?;

        let (users, videos, records) = dataset.counts();
        info!(
            "Aggregated into {} users, {} videos, {} user-video pairs",
            users, videos, records
        );
        Ok(dataset)
    }

    /// Aggregate raw events by summing values per (user, video) pair.
    ///
    /// Fails if any aggregated strength is negative or not finite.
    pub fn from_raw(raw: impl IntoIterator<Item = RawInteraction>) -> Result<Self> {
        let mut sums: BTreeMap<(UserKey, VideoKey), f64> = BTreeMap::new();
        let mut events = 0usize;
        for event in raw {
            events += 1;
            *sums.entry((event.user_key, event.video_key)).or_insert(0.0) += f64::from(event.value);
        }
        debug!("Aggregating {} events into {} pairs", events, sums.len());

        let mut dataset = InteractionDataset::default();
        for ((user_key, video_key), sum) in sums {
            let strength = sum as f32;
            if !strength.is_finite() || strength < 0.0 {
                return Err(DataLoadError::InvalidValue {
                    field: format!("strength for ({}, {})", user_key, video_key),
                    value: strength.to_string(),
                });
            }
            dataset.users.insert(&user_key);
            dataset.videos.insert(&video_key);
            dataset.records.push(AggregatedRecord {
                user_key,
                video_key,
                strength,
            });
        }
        Ok(dataset)
    }

    /// Records translated to dense index triples
    pub fn interactions(&self) -> Vec<Interaction> {
        self.records
            .iter()
            .filter_map(|record| {
                Some(Interaction::new(
                    self.users.index_of(&record.user_key)?,
                    self.videos.index_of(&record.video_key)?,
                    record.strength,
                ))
            })
            .collect()
    }

    /// Build the `users × videos` interaction matrix
    pub fn to_matrix(&self) -> Result<InteractionMatrix> {
        let matrix = InteractionMatrix::from_interactions(
            self.users.len(),
            self.videos.len(),
            &self.interactions(),
        )?;
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_events() -> Vec<RawInteraction> {
        vec![
            RawInteraction::new("u001", "v001", 2.0),
            RawInteraction::new("u002", "v003", 4.0),
            RawInteraction::new("u001", "v002", 1.0),
            RawInteraction::new("u004", "v005", 3.0),
            RawInteraction::new("u003", "v004", 1.0),
            RawInteraction::new("u005", "v001", 1.0),
            RawInteraction::new("u001", "v001", 1.0),
        ]
    }

    #[test]
    fn test_aggregation_sums_duplicates() {
        let dataset = InteractionDataset::from_raw(raw_events()).unwrap();
        assert_eq!(dataset.counts(), (5, 5, 6));

        let first = &dataset.records()[0];
        assert_eq!(first.user_key, "u001");
        assert_eq!(first.video_key, "v001");
        assert_eq!(first.strength, 3.0);
    }

    #[test]
    fn test_index_assignment() {
        let dataset = InteractionDataset::from_raw(raw_events()).unwrap();

        // users sorted, videos first-seen over the sorted records
        for (idx, key) in ["u001", "u002", "u003", "u004", "u005"].iter().enumerate() {
            assert_eq!(dataset.users().index_of(key), Some(idx));
        }
        for (idx, key) in ["v001", "v002", "v003", "v004", "v005"].iter().enumerate() {
            assert_eq!(dataset.videos().index_of(key), Some(idx));
        }
    }

    #[test]
    fn test_interactions_and_matrix() {
        let dataset = InteractionDataset::from_raw(raw_events()).unwrap();
        let interactions = dataset.interactions();
        assert_eq!(
            interactions,
            vec![
                Interaction::new(0, 0, 3.0),
                Interaction::new(0, 1, 1.0),
                Interaction::new(1, 2, 4.0),
                Interaction::new(2, 3, 1.0),
                Interaction::new(3, 4, 3.0),
                Interaction::new(4, 0, 1.0),
            ]
        );

        let matrix = dataset.to_matrix().unwrap();
        assert_eq!(matrix.shape(), (5, 5));
        assert_eq!(matrix.nnz(), 6);
    }

    #[test]
    fn test_negative_strength_is_rejected() {
        let raw = vec![
            RawInteraction::new("u1", "v1", 1.0),
            RawInteraction::new("u1", "v1", -3.0),
        ];
        assert!(matches!(
            InteractionDataset::from_raw(raw),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let dataset = InteractionDataset::from_raw(Vec::new()).unwrap();
        assert_eq!(dataset.counts(), (0, 0, 0));
        assert_eq!(dataset.to_matrix().unwrap().shape(), (0, 0));
    }
}
