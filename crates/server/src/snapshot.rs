//! Persisted model snapshot: factor store, id maps and training interactions.
//!
//! A snapshot is one JSON document. Saving writes a sibling temp file and
//! renames it over the target, so a reader sees either the previous
//! snapshot or the new one, never a partial write.

use crate::error::SnapshotError;
use als::{FactorStore, Interaction, InteractionMatrix};
use data_loader::IdMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SNAPSHOT_FORMAT: &str = "vidrec-als";
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything a serving process needs to answer requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub format: String,
    pub version: u32,
    pub store: FactorStore,
    pub users: IdMap,
    pub items: IdMap,
    /// Training interactions, used to filter already-watched videos
    pub interactions: Vec<Interaction>,
}

impl ModelSnapshot {
    pub fn new(store: FactorStore, users: IdMap, items: IdMap, interactions: Vec<Interaction>) -> Self {
        Self {
            format: SNAPSHOT_FORMAT.to_string(),
            version: SNAPSHOT_VERSION,
            store,
            users,
            items,
            interactions,
        }
    }

    /// Check the header, the store's internal shape and its agreement with
    /// the id maps
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.format != SNAPSHOT_FORMAT || self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedFormat {
                format: self.format.clone(),
                version: self.version,
            });
        }
        self.store.validate()?;
        self.store.check_shape(self.users.len(), self.items.len())?;
        Ok(())
    }

    /// Rebuild the training interaction matrix
    pub fn matrix(&self) -> Result<InteractionMatrix, SnapshotError> {
        let matrix =
            InteractionMatrix::from_interactions(self.users.len(), self.items.len(), &self.interactions)?;
        Ok(matrix)
    }

    /// Write the snapshot to `path`, replacing any existing file atomically
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let tmp = temp_path(path);
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        info!(
            "Saved snapshot to {:?} ({} users, {} videos)",
            path,
            self.users.len(),
            self.items.len()
        );
        Ok(())
    }

    /// Read and validate a snapshot
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        debug!("Loading snapshot from {:?}", path);
        let reader = BufReader::new(File::open(path)?);
        let snapshot: ModelSnapshot = serde_json::from_reader(reader)?;
        snapshot.validate()?;
        info!(
            "Loaded snapshot from {:?} ({} users, {} videos, {} factors)",
            path,
            snapshot.users.len(),
            snapshot.items.len(),
            snapshot.store.factors()
        );
        Ok(snapshot)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
