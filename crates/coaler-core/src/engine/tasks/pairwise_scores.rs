use crate::core::models::ids::PoseId;
use crate::core::models::ligand::Ligand;
use crate::core::models::pairs::PosePair;
use crate::core::scoring::{PoseOracle, checked_score};
use crate::engine::alignment::PairwiseAlignment;
use crate::engine::error::EngineError;
use crate::engine::pool::WorkerPool;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of pose pairs across all ligand pairs.
pub fn expected_combinations(ligands: &[Ligand]) -> usize {
    ligands
        .iter()
        .tuple_combinations()
        .map(|(a, b)| a.num_poses() * b.num_poses())
        .sum()
}

/// Scores every pose pair of every ligand pair through the oracle.
///
/// Ligand pairs are visited one after another; the pose pairs of a single ligand pair are
/// scored in parallel on `pool`, each inserting its own key under the matrix lock.
#[instrument(skip_all, name = "pairwise_scores_task")]
pub fn run(
    ligands: &[Ligand],
    oracle: &dyn PoseOracle,
    pool: &WorkerPool,
    reporter: &ProgressReporter,
) -> Result<PairwiseAlignment, EngineError> {
    let combinations = expected_combinations(ligands);
    info!(
        combinations,
        "Calculating pairwise pose scores. This may take some time."
    );

    let ligand_pairs: Vec<(&Ligand, &Ligand)> = ligands.iter().tuple_combinations().collect();
    reporter.report(Progress::TaskStart {
        total_steps: ligand_pairs.len() as u64,
    });

    let alignment = Mutex::new(PairwiseAlignment::with_capacity(combinations));

    for (first, second) in ligand_pairs {
        let index_pairs: Vec<(PoseId, PoseId)> = (0..first.num_poses())
            .flat_map(|i| (0..second.num_poses()).map(move |j| (i, j)))
            .collect();

        pool.install(|| {
            #[cfg(not(feature = "parallel"))]
            let iterator = index_pairs.iter();

            #[cfg(feature = "parallel")]
            let iterator = index_pairs.par_iter();

            iterator.try_for_each(|&(idx_a, idx_b)| -> Result<(), EngineError> {
                let pair = PosePair::new(first.poses()[idx_a], second.poses()[idx_b]);
                let score = checked_score(oracle, pair)?;
                let mut matrix = alignment.lock().map_err(|_| matrix_lock_poisoned())?;
                matrix.insert(pair, score);
                Ok(())
            })
        })?;

        debug!(
            first = first.id(),
            second = second.id(),
            pairs = index_pairs.len(),
            "Scored ligand pair."
        );
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);

    let alignment = alignment.into_inner().map_err(|_| matrix_lock_poisoned())?;
    info!(
        scores = alignment.len(),
        "Finished calculating pairwise pose scores."
    );
    Ok(alignment)
}

fn matrix_lock_poisoned() -> EngineError {
    EngineError::Internal("score matrix lock poisoned".into())
}
