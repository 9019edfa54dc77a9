//! Recommendation pipeline over a trained ALS factor store.
//!
//! This crate provides:
//! - Recommender for per-user top-K lists and item-to-item similarity
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - Ranking with a deterministic tie-break
//! - Offline evaluation (precision@K, recall@K)
//!
//! ## Architecture
//! A request is processed in stages:
//! 1. Every item is scored against the user's latent vector
//! 2. Filters remove items the user already interacted with, plus any exclusions
//! 3. The survivors are ranked and truncated to K
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::Recommender;
//! use std::sync::Arc;
//!
//! let recommender = Recommender::new(Arc::new(store));
//! let row = matrix.row(user_idx).unwrap();
//! for item in recommender.recommend(user_idx, row, 5)? {
//!     println!("{} {:.3}", item.item_idx, item.score);
//! }
//! ```

pub mod error;
pub mod types;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod ranking;
pub mod recommender;
pub mod evaluation;

// Re-export main types
pub use error::{RecommendError, Result};
pub use evaluation::{evaluate, precision_at_k, recall_at_k, EvaluationReport};
pub use filter_pipeline::FilterPipeline;
pub use recommender::Recommender;
pub use traits::Filter;
pub use types::{RequestContext, ScoredItem};
