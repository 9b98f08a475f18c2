use super::alignment::PairwiseAlignment;
use crate::core::models::ids::{LigandId, PoseId, UniquePoseId};
use crate::core::models::ligand::Ligand;
use crate::core::models::pairs::{LigandPair, PosePair};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// The scores recorded for one ligand pair, together with the pose combination that scores
/// highest (the "ideal" the deficit heuristic measures against).
#[derive(Debug, Clone)]
pub struct PoseRegister {
    ligands: LigandPair,
    highest_scoring_pair: PosePair,
    highest_score: f64,
    scores: HashMap<(PoseId, PoseId), f64>,
}

impl PoseRegister {
    /// Builds a register from the entries of a single ligand pair. Ties are resolved towards
    /// the lowest pose indices so that the result never depends on hash order.
    fn from_entries(ligands: LigandPair, mut entries: Vec<(PosePair, f64)>) -> Option<Self> {
        entries.sort_unstable_by_key(|(pair, _)| *pair);

        let mut best: Option<(PosePair, f64)> = None;
        let mut scores = HashMap::with_capacity(entries.len());

        for (pair, score) in entries {
            scores.insert((pair.first().pose_id, pair.second().pose_id), score);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pair, score));
            }
        }

        best.map(|(highest_scoring_pair, highest_score)| Self {
            ligands,
            highest_scoring_pair,
            highest_score,
            scores,
        })
    }

    #[inline]
    pub fn ligands(&self) -> LigandPair {
        self.ligands
    }

    #[inline]
    pub fn highest_scoring_pair(&self) -> PosePair {
        self.highest_scoring_pair
    }

    #[inline]
    pub fn highest_score(&self) -> f64 {
        self.highest_score
    }

    /// Recorded score of two poses of this register's ligands, in either order.
    pub fn score_of(&self, a: UniquePoseId, b: UniquePoseId) -> Option<f64> {
        let pair = PosePair::try_new(a, b)?;
        if pair.ligands() != self.ligands {
            return None;
        }
        self.scores
            .get(&(pair.first().pose_id, pair.second().pose_id))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// One [`PoseRegister`] per ligand pair that has at least one recorded score. Read-only once
/// built.
#[derive(Debug, Default, Clone)]
pub struct PoseRegisterCollection {
    registers: HashMap<LigandPair, PoseRegister>,
}

impl PoseRegisterCollection {
    /// Register for two ligands in either order; `None` for identical ids or unscored pairs.
    pub fn get(&self, a: LigandId, b: LigandId) -> Option<&PoseRegister> {
        if a == b {
            return None;
        }
        self.registers.get(&LigandPair::new(a, b))
    }

    pub fn highest_scoring_pair(&self, a: LigandId, b: LigandId) -> Option<PosePair> {
        self.get(a, b).map(PoseRegister::highest_scoring_pair)
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LigandPair, &PoseRegister)> {
        self.registers.iter()
    }
}

#[instrument(skip_all, name = "pose_register_build")]
pub fn build_pose_registers(
    alignment: &PairwiseAlignment,
    ligands: &[Ligand],
) -> PoseRegisterCollection {
    let mut grouped: HashMap<LigandPair, Vec<(PosePair, f64)>> = HashMap::new();
    for (pair, &score) in alignment.iter() {
        grouped
            .entry(pair.ligands())
            .or_default()
            .push((*pair, score));
    }

    let registers: HashMap<_, _> = grouped
        .into_iter()
        .filter_map(|(ligand_pair, entries)| {
            PoseRegister::from_entries(ligand_pair, entries).map(|r| (ligand_pair, r))
        })
        .collect();

    let possible_pairs = ligands.len() * ligands.len().saturating_sub(1) / 2;
    debug!(
        registers = registers.len(),
        possible_pairs, "Pose registers built."
    );

    PoseRegisterCollection { registers }
}
