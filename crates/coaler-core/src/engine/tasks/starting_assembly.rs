use crate::core::models::ids::{PoseId, UniquePoseId};
use crate::core::models::ligand::Ligand;
use crate::engine::assembly::LigandAlignmentAssembly;
use crate::engine::registers::PoseRegisterCollection;
use tracing::trace;

/// Builds a starting assembly around `seed`.
///
/// The seed's ligand takes the seed pose. The remaining ligands are then placed greedily, one
/// per round: every unplaced ligand proposes the pose with the highest summed register score
/// against the ligands already placed, and the strongest proposal is accepted. When no unplaced
/// ligand has a recorded score against the placed ones, the first unplaced ligand with a register
/// towards another unplaced ligand takes its side of that register's ideal pair. Ligands that can
/// propose nothing stay missing. Ties go to the lowest ligand id and pose index, so the result is
/// a pure function of its inputs.
pub fn generate(
    seed: UniquePoseId,
    registers: &PoseRegisterCollection,
    ligands: &[Ligand],
) -> LigandAlignmentAssembly {
    let mut assembly = LigandAlignmentAssembly::new(ligands.len());
    assembly.assign(seed.ligand_id, seed.pose_id);

    let mut pending: Vec<&Ligand> = ligands
        .iter()
        .filter(|ligand| ligand.id() != seed.ligand_id)
        .collect();

    loop {
        let mut best: Option<(usize, PoseId, f64)> = None;
        for (idx, ligand) in pending.iter().enumerate() {
            if let Some((pose_id, compatibility)) = propose_pose(ligand, &assembly, registers)
                && best.is_none_or(|(_, _, best_compat)| compatibility > best_compat)
            {
                best = Some((idx, pose_id, compatibility));
            }
        }

        let Some((idx, pose_id, compatibility)) =
            best.or_else(|| ideal_pose_without_neighbours(&pending, registers))
        else {
            break;
        };
        let ligand = pending.remove(idx);
        trace!(
            ligand = ligand.id(),
            pose = pose_id,
            compatibility,
            "Placed ligand in starting assembly."
        );
        assembly.assign(ligand.id(), pose_id);
    }

    if !pending.is_empty() {
        trace!(
            seed = %seed,
            missing = pending.len(),
            "Starting assembly left ligands unplaced."
        );
    }
    assembly
}

fn propose_pose(
    ligand: &Ligand,
    assembly: &LigandAlignmentAssembly,
    registers: &PoseRegisterCollection,
) -> Option<(PoseId, f64)> {
    let mut best: Option<(PoseId, f64)> = None;

    for &candidate in ligand.poses() {
        let mut compatibility = 0.0;
        let mut neighbours = 0;
        for (placed_id, placed_pose) in assembly.iter() {
            let score = registers
                .get(placed_id, ligand.id())
                .and_then(|r| r.score_of(UniquePoseId::new(placed_id, placed_pose), candidate));
            if let Some(score) = score {
                compatibility += score;
                neighbours += 1;
            }
        }
        if neighbours == 0 {
            continue;
        }
        if best.is_none_or(|(_, best_compat)| compatibility > best_compat) {
            best = Some((candidate.pose_id, compatibility));
        }
    }

    best
}

fn ideal_pose_without_neighbours(
    pending: &[&Ligand],
    registers: &PoseRegisterCollection,
) -> Option<(usize, PoseId, f64)> {
    pending.iter().enumerate().find_map(|(idx, ligand)| {
        pending
            .iter()
            .filter_map(|other| registers.get(ligand.id(), other.id()))
            .find_map(|register| {
                register
                    .highest_scoring_pair()
                    .pose_of(ligand.id())
                    .map(|pose_id| (idx, pose_id, register.highest_score()))
            })
    })
}
