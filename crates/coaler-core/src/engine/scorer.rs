use super::alignment::PairwiseAlignment;
use super::assembly::LigandAlignmentAssembly;
use super::config::DeficitPolicy;
use super::error::EngineError;
use super::registers::PoseRegisterCollection;
use crate::core::models::ids::{LigandId, UniquePoseId};
use crate::core::models::ligand::Ligand;
use crate::core::models::pairs::PosePair;
use crate::core::scoring::{PoseOracle, checked_score};
use itertools::Itertools;
use tracing::trace;

/// Scores assemblies against a pairwise score matrix.
///
/// Matrix entries that are missing are computed on demand through the oracle. The fresh value
/// is not written back; callers wanting a complete matrix use
/// [`PairwiseAlignment::ensure_for_assembly`].
#[derive(Clone, Copy)]
pub struct AssemblyScorer<'a> {
    alignment: &'a PairwiseAlignment,
    ligands: &'a [Ligand],
    oracle: &'a dyn PoseOracle,
}

impl<'a> AssemblyScorer<'a> {
    pub fn new(
        alignment: &'a PairwiseAlignment,
        ligands: &'a [Ligand],
        oracle: &'a dyn PoseOracle,
    ) -> Self {
        Self {
            alignment,
            ligands,
            oracle,
        }
    }

    #[inline]
    pub fn ligands(&self) -> &'a [Ligand] {
        self.ligands
    }

    /// Sum of pair scores over every ligand pair with both sides assigned.
    ///
    /// Assemblies with fewer than two assigned ligands score exactly zero.
    pub fn score(&self, assembly: &LigandAlignmentAssembly) -> Result<f64, EngineError> {
        let mut total = 0.0;
        for (first, second) in self.ligands.iter().tuple_combinations() {
            let (Some(pose_a), Some(pose_b)) = (
                assembly.unique_pose_of(first.id()),
                assembly.unique_pose_of(second.id()),
            ) else {
                continue;
            };
            total += self.pair_score(pose_a, pose_b)?;
        }
        Ok(total)
    }

    /// Matrix score of two poses, falling back to the oracle for missing entries.
    pub fn pair_score(&self, a: UniquePoseId, b: UniquePoseId) -> Result<f64, EngineError> {
        let pair = PosePair::try_new(a, b).ok_or_else(|| {
            EngineError::Internal(format!("poses {a} and {b} belong to the same ligand"))
        })?;
        match self.alignment.get_pair(&pair) {
            Some(score) => Ok(score),
            None => {
                trace!(%pair, "Score missing from matrix, asking the oracle.");
                Ok(checked_score(self.oracle, pair)?)
            }
        }
    }

    /// How far the pairs involving `ligand_id` fall short of their register ideals.
    ///
    /// Walks every id in `0..=max_ligand_id` except `ligand_id`. Only pairs scoring below the
    /// ideal contribute; a pair doing better than its ideal adds nothing. Peers without a
    /// register (no recorded scores) are skipped, and unassigned sides are handled according to
    /// `policy`. The value orders ligands for perturbation and is not a target score.
    pub fn score_deficit(
        &self,
        ligand_id: LigandId,
        max_ligand_id: LigandId,
        assembly: &LigandAlignmentAssembly,
        registers: &PoseRegisterCollection,
        policy: DeficitPolicy,
    ) -> Result<f64, EngineError> {
        let own_pose = assembly.unique_pose_of(ligand_id);
        let mut deficit = 0.0;

        for peer_id in 0..=max_ligand_id {
            if peer_id == ligand_id {
                continue;
            }
            let Some(register) = registers.get(ligand_id, peer_id) else {
                continue;
            };
            let ideal = register.highest_score();

            let current = match (own_pose, assembly.unique_pose_of(peer_id)) {
                (Some(own), Some(peer)) => self.pair_score(own, peer)?,
                _ => match policy {
                    DeficitPolicy::SkipAbsentPeers => continue,
                    DeficitPolicy::IncludeAbsentPeers => 0.0,
                },
            };

            if ideal <= current {
                continue;
            }
            deficit += (ideal - current).abs();
        }
        Ok(deficit)
    }
}
