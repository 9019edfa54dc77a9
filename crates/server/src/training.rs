//! Offline training: aggregated dataset in, servable snapshot out.

use crate::error::SnapshotError;
use crate::snapshot::ModelSnapshot;
use als::{AlsConfig, AlsTrainer};
use data_loader::InteractionDataset;
use std::time::Instant;
use tracing::{info, instrument};

/// Build the interaction matrix for `dataset`, train a factor store on it
/// and package both id maps with the result.
///
/// Fails fast on the first matrix or training error; no partial snapshot
/// is ever returned.
#[instrument(skip_all, fields(factors = config.factors, iterations = config.iterations))]
pub fn train_snapshot(dataset: &InteractionDataset, config: AlsConfig) -> Result<ModelSnapshot, SnapshotError> {
    let start = Instant::now();
    let trainer = AlsTrainer::new(config)?;

    let matrix = dataset.to_matrix()?;
    let (users, items) = matrix.shape();
    info!(
        "Built {}x{} interaction matrix with {} entries",
        users,
        items,
        matrix.nnz()
    );

    let store = trainer.fit(&matrix)?;
    info!("Training finished in {:.2?}", start.elapsed());

    Ok(ModelSnapshot::new(
        store,
        dataset.users().clone(),
        dataset.videos().clone(),
        matrix.iter().collect(),
    ))
}
