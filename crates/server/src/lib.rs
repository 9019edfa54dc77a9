//! Server crate for the video recommendation engine.
//!
//! This crate ties the engine crates together for serving:
//! - `training`: dataset → trained [`ModelSnapshot`]
//! - `snapshot`: atomic JSON persistence of a trained model
//! - `service`: immutable [`RecommendationService`] answering key-based requests
//! - `http`: axum router exposing the service

pub mod error;
pub mod http;
pub mod service;
pub mod snapshot;
pub mod training;

pub use error::{ServiceError, SnapshotError};
pub use http::{router, serve};
pub use service::{Recommendation, RecommendationService};
pub use snapshot::ModelSnapshot;
pub use training::train_snapshot;
