//! Core domain types for interaction data.
//!
//! Users and videos arrive as opaque string keys. Each key space gets its
//! own [`IdMap`], a bijection between keys and dense indices `0..n` handed
//! out in first-seen order.

use crate::error::DataLoadError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque user key (e.g. "u001")
pub type UserKey = String;

/// Opaque video key (e.g. "v001")
pub type VideoKey = String;

// =============================================================================
// Interaction Records
// =============================================================================

/// One raw engagement event as read from the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInteraction {
    pub user_key: UserKey,
    pub video_key: VideoKey,
    pub value: f32,
}

impl RawInteraction {
    pub fn new(user_key: impl Into<String>, video_key: impl Into<String>, value: f32) -> Self {
        Self {
            user_key: user_key.into(),
            video_key: video_key.into(),
            value,
        }
    }
}

/// Summed strength for one (user, video) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    pub user_key: UserKey,
    pub video_key: VideoKey,
    pub strength: f32,
}

// =============================================================================
// IdMap
// =============================================================================

/// Bijective map between string keys and dense indices.
///
/// Serialized as the ordered key list; deserializing rejects a list that
/// repeats a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct IdMap {
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `key`, assigning the next free index if it is new
    pub fn insert(&mut self, key: &str) -> usize {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.keys.len();
        self.keys.push(key.to_string());
        self.index.insert(key.to_string(), idx);
        idx
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn key_of(&self, idx: usize) -> Option<&str> {
        self.keys.get(idx).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in index order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl TryFrom<Vec<String>> for IdMap {
    type Error = DataLoadError;

    fn try_from(keys: Vec<String>) -> Result<Self, Self::Error> {
        let mut map = IdMap::new();
        for key in &keys {
            if map.contains(key) {
                return Err(DataLoadError::DuplicateKey(key.clone()));
            }
            map.insert(key);
        }
        Ok(map)
    }
}

impl From<IdMap> for Vec<String> {
    fn from(map: IdMap) -> Self {
        map.keys
    }
}

// =============================================================================
// InteractionDataset
// =============================================================================

/// Aggregated interactions plus the two id maps for one training snapshot.
///
/// Built once per training run; see `index.rs` for construction.
#[derive(Debug, Clone, Default)]
pub struct InteractionDataset {
    pub(crate) users: IdMap,
    pub(crate) videos: IdMap,
    /// Ordered by (user key, video key), one record per pair
    pub(crate) records: Vec<AggregatedRecord>,
}

impl InteractionDataset {
    pub fn users(&self) -> &IdMap {
        &self.users
    }

    pub fn videos(&self) -> &IdMap {
        &self.videos
    }

    pub fn records(&self) -> &[AggregatedRecord] {
        &self.records
    }

    /// `(users, videos, records)`
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.videos.len(), self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_first_seen_order() {
        let mut map = IdMap::new();
        assert_eq!(map.insert("v003"), 0);
        assert_eq!(map.insert("v001"), 1);
        assert_eq!(map.insert("v003"), 0);
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys(), &["v003".to_string(), "v001".to_string()]);
    }

    #[test]
    fn test_round_trip_key_index_key() {
        let mut map = IdMap::new();
        for key in ["u001", "u002", "u003"] {
            map.insert(key);
        }
        for idx in 0..map.len() {
            let key = map.key_of(idx).unwrap();
            assert_eq!(map.index_of(key), Some(idx));
        }
        assert_eq!(map.index_of("u999"), None);
        assert_eq!(map.key_of(3), None);
    }

    #[test]
    fn test_serde_as_key_list() {
        let mut map = IdMap::new();
        map.insert("b");
        map.insert("a");

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"["b","a"]"#);

        let back: IdMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let result: Result<IdMap, _> = serde_json::from_str(r#"["a","b","a"]"#);
        assert!(result.is_err());
    }
}
