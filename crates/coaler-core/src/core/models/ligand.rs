use super::ids::{LigandId, PoseId, UniquePoseId};

/// A ligand to be aligned: a stable id plus its candidate poses.
///
/// Pose indices are dense (`0..num_poses`). The ligand carries no optimisation state; the
/// geometry behind each pose lives with whoever implements the
/// [`PoseOracle`](crate::core::scoring::PoseOracle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ligand {
    id: LigandId,
    poses: Vec<UniquePoseId>,
}

impl Ligand {
    pub fn new(id: LigandId, num_poses: usize) -> Self {
        Self {
            id,
            poses: (0..num_poses)
                .map(|pose| UniquePoseId::new(id, pose))
                .collect(),
        }
    }

    #[inline]
    pub fn id(&self) -> LigandId {
        self.id
    }

    #[inline]
    pub fn poses(&self) -> &[UniquePoseId] {
        &self.poses
    }

    #[inline]
    pub fn num_poses(&self) -> usize {
        self.poses.len()
    }

    pub fn pose_ids(&self) -> impl Iterator<Item = PoseId> + '_ {
        self.poses.iter().map(|pose| pose.pose_id)
    }
}
