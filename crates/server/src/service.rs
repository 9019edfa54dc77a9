//! The serving-side view of one trained model.
//!
//! A `RecommendationService` is built once from a snapshot and never
//! mutated afterwards; share it behind an `Arc` and call it from as many
//! threads as needed.

use crate::error::{Result, ServiceError, SnapshotError};
use crate::snapshot::ModelSnapshot;
use als::{InteractionMatrix, RowView};
use data_loader::IdMap;
use pipeline::{Recommender, ScoredItem};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// One recommended or similar video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "videoId")]
    pub item_key: String,
    pub score: f64,
}

/// Immutable recommender plus the id maps that translate keys to indices
pub struct RecommendationService {
    recommender: Recommender,
    matrix: InteractionMatrix,
    users: IdMap,
    items: IdMap,
}

impl RecommendationService {
    /// Validate the snapshot and index its training interactions
    pub fn from_snapshot(snapshot: ModelSnapshot) -> std::result::Result<Self, SnapshotError> {
        snapshot.validate()?;
        let matrix = snapshot.matrix()?;
        let ModelSnapshot { store, users, items, .. } = snapshot;

        info!(
            "Serving {} users and {} videos ({} training interactions)",
            users.len(),
            items.len(),
            matrix.nnz()
        );
        Ok(Self {
            recommender: Recommender::new(Arc::new(store)),
            matrix,
            users,
            items,
        })
    }

    pub fn users(&self) -> &IdMap {
        &self.users
    }

    pub fn items(&self) -> &IdMap {
        &self.items
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    /// Top `k` unwatched videos for `user_key`.
    ///
    /// An empty list means the user is known but has nothing left to
    /// recommend; an unknown user is `ServiceError::UnknownUser`.
    pub fn recommend(&self, user_key: &str, k: usize) -> Result<Vec<Recommendation>> {
        let user_idx = self
            .users
            .index_of(user_key)
            .ok_or_else(|| ServiceError::UnknownUser(user_key.to_string()))?;
        let row = self.matrix.row(user_idx).unwrap_or(RowView::empty());

        let ranked = self.recommender.recommend(user_idx, row, k)?;
        debug!("User {} -> {} recommendations", user_key, ranked.len());
        self.to_recommendations(ranked)
    }

    /// Up to `k` videos closest to `video_key` in factor space
    pub fn similar_items(&self, video_key: &str, k: usize) -> Result<Vec<Recommendation>> {
        let item_idx = self
            .items
            .index_of(video_key)
            .ok_or_else(|| ServiceError::UnknownItem(video_key.to_string()))?;

        let ranked = self.recommender.similar_items(item_idx, k)?;
        self.to_recommendations(ranked)
    }

    fn to_recommendations(&self, ranked: Vec<ScoredItem>) -> Result<Vec<Recommendation>> {
        ranked
            .into_iter()
            .map(|item| {
                let key = self.items.key_of(item.item_idx).ok_or_else(|| {
                    ServiceError::Internal(format!("no video key for index {}", item.item_idx))
                })?;
                Ok(Recommendation {
                    item_key: key.to_string(),
                    score: f64::from(item.score),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::train_snapshot;
    use als::AlsConfig;
    use data_loader::{InteractionDataset, RawInteraction};

    fn service() -> RecommendationService {
        let dataset = InteractionDataset::from_raw(vec![
            RawInteraction::new("u001", "v001", 3.0),
            RawInteraction::new("u001", "v002", 1.0),
            RawInteraction::new("u002", "v003", 4.0),
            RawInteraction::new("u003", "v004", 1.0),
            RawInteraction::new("u004", "v005", 3.0),
            RawInteraction::new("u005", "v001", 1.0),
        ])
        .unwrap();
        let snapshot = train_snapshot(&dataset, AlsConfig::default()).unwrap();
        RecommendationService::from_snapshot(snapshot).unwrap()
    }

    #[test]
    fn test_recommend_by_key() {
        let service = service();
        let recs = service.recommend("u002", 5).unwrap();

        let mut keys: Vec<&str> = recs.iter().map(|r| r.item_key.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["v001", "v002", "v004", "v005"]);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_unknown_user() {
        let service = service();
        let err = service.recommend("u999", 5).unwrap_err();
        assert!(matches!(err, ServiceError::UnknownUser(ref key) if key == "u999"));
        assert_eq!(err.to_string(), "User 'u999' not found");
    }

    #[test]
    fn test_similar_items_by_key() {
        let service = service();
        let similar = service.similar_items("v001", 2).unwrap();
        assert_eq!(similar.len(), 2);
        assert!(similar.iter().all(|r| r.item_key != "v001"));

        assert!(matches!(
            service.similar_items("v999", 2),
            Err(ServiceError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_recommendation_wire_format() {
        let rec = Recommendation {
            item_key: "v003".to_string(),
            score: 0.5,
        };
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            serde_json::json!({"videoId": "v003", "score": 0.5})
        );
    }
}
