//! # Data Loader Crate
//!
//! This crate turns the raw interaction event log into the inputs of the
//! ALS engine.
//!
//! ## Main Components
//!
//! - **types**: Domain types (RawInteraction, AggregatedRecord, IdMap, InteractionDataset)
//! - **parser**: Parse the interactions CSV into Rust structs
//! - **index**: Aggregate per (user, video) pair and assign dense indices
//! - **split**: Seeded train/test holdout for offline evaluation
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::InteractionDataset;
//! use std::path::Path;
//!
//! let dataset = InteractionDataset::load_from_file(Path::new("data/interactions.csv"))?;
//! let matrix = dataset.to_matrix()?;
//!
//! let user_idx = dataset.users().index_of("u002").unwrap();
//! println!("u002 watched {} videos", matrix.row(user_idx).unwrap().nnz());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod split;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use split::{holdout_split, HoldoutSplit};
pub use types::{
    // Type aliases
    UserKey,
    VideoKey,
    // Core types
    AggregatedRecord,
    IdMap,
    InteractionDataset,
    RawInteraction,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_to_matrix() {
        let csv = "userId,videoId,interactionValue\n\
                   u001,v001,1\n\
                   u001,v001,2\n\
                   u001,v002,1\n\
                   u002,v003,4\n";
        let raw = parser::parse_interactions_str(csv, "interactions.csv").unwrap();
        let dataset = InteractionDataset::from_raw(raw).unwrap();
        let matrix = dataset.to_matrix().unwrap();

        let u001 = dataset.users().index_of("u001").unwrap();
        let v001 = dataset.videos().index_of("v001").unwrap();
        assert_eq!(matrix.row(u001).unwrap().get(v001), 3.0);
        assert_eq!(matrix.nnz(), 3);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = InteractionDataset::default();
        assert_eq!(dataset.counts(), (0, 0, 0));
        assert!(dataset.users().is_empty());
        assert!(dataset.videos().is_empty());
    }
}
