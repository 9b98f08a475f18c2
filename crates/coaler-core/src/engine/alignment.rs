use super::assembly::LigandAlignmentAssembly;
use super::error::EngineError;
use crate::core::models::ids::UniquePoseId;
use crate::core::models::pairs::PosePair;
use crate::core::scoring::{PoseOracle, checked_score};
use itertools::Itertools;
use std::collections::HashMap;
use tracing::debug;

/// Pairwise compatibility scores keyed by canonical [`PosePair`].
///
/// Lookups accept poses in either order; canonicalisation happens here rather than at the call
/// sites. Built once by the matrix construction task and read-mostly afterwards.
#[derive(Debug, Default, Clone)]
pub struct PairwiseAlignment {
    scores: HashMap<PosePair, f64>,
}

impl PairwiseAlignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scores: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, pair: PosePair, score: f64) -> Option<f64> {
        self.scores.insert(pair, score)
    }

    /// # Panics
    ///
    /// Panics if both poses belong to the same ligand.
    pub fn insert_poses(&mut self, a: UniquePoseId, b: UniquePoseId, score: f64) -> Option<f64> {
        self.insert(PosePair::new(a, b), score)
    }

    #[inline]
    pub fn get_pair(&self, pair: &PosePair) -> Option<f64> {
        self.scores.get(pair).copied()
    }

    /// Score of two poses in either order; `None` for missing entries and same-ligand poses.
    pub fn get(&self, a: UniquePoseId, b: UniquePoseId) -> Option<f64> {
        PosePair::try_new(a, b).and_then(|pair| self.get_pair(&pair))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PosePair, &f64)> {
        self.scores.iter()
    }

    /// Computes and stores every score the assembly's assigned pose pairs still lack.
    ///
    /// Returns the number of entries added.
    pub fn ensure_for_assembly(
        &mut self,
        assembly: &LigandAlignmentAssembly,
        oracle: &dyn PoseOracle,
    ) -> Result<usize, EngineError> {
        let mut added = 0;
        for ((ligand_a, pose_a), (ligand_b, pose_b)) in assembly.iter().tuple_combinations() {
            let pair = PosePair::new(
                UniquePoseId::new(ligand_a, pose_a),
                UniquePoseId::new(ligand_b, pose_b),
            );
            if self.scores.contains_key(&pair) {
                continue;
            }
            let score = checked_score(oracle, pair)?;
            self.scores.insert(pair, score);
            added += 1;
        }
        if added > 0 {
            debug!(added, "Filled missing pairwise scores for assembly.");
        }
        Ok(added)
    }
}
