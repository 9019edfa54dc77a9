//! # ALS Crate
//!
//! Latent-factor collaborative filtering for implicit feedback.
//!
//! ## Components
//!
//! - **matrix**: sparse user × item interaction matrix (CSR)
//! - **factors**: the trained user and item factor matrices
//! - **trainer**: alternating least squares with confidence weighting
//! - **config**: training hyper-parameters
//!
//! ## Example Usage
//!
//! ```ignore
//! use als::{AlsConfig, AlsTrainer, Interaction, InteractionMatrix};
//!
//! let matrix = InteractionMatrix::from_interactions(
//!     num_users,
//!     num_items,
//!     &[Interaction::new(0, 0, 3.0), Interaction::new(1, 2, 4.0)],
//! )?;
//!
//! let trainer = AlsTrainer::new(AlsConfig::default())?;
//! let store = trainer.fit(&matrix)?;
//! let score = store.score(0, 2);
//! ```

pub mod config;
pub mod error;
pub mod factors;
mod linalg;
pub mod matrix;
pub mod trainer;

pub use config::AlsConfig;
pub use error::{AlsError, Axis, Result};
pub use factors::FactorStore;
pub use matrix::{Interaction, InteractionMatrix, RowView};
pub use trainer::{training_loss, AlsTrainer};
