//! Error types for the server crate.

use als::AlsError;
use data_loader::DataLoadError;
use pipeline::RecommendError;
use std::io;
use thiserror::Error;

/// Errors returned by [`crate::RecommendationService`] requests
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The user key is not in the snapshot's user map
    #[error("User '{0}' not found")]
    UnknownUser(String),

    /// The video key is not in the snapshot's item map
    #[error("Video '{0}' not found")]
    UnknownItem(String),

    #[error("Recommender error: {0}")]
    Recommend(#[from] RecommendError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors while building, saving or loading a model snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot format '{format}' version {version}")]
    UnsupportedFormat { format: String, version: u32 },

    #[error("Model error: {0}")]
    Model(#[from] AlsError),

    #[error("Data error: {0}")]
    Data(#[from] DataLoadError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
