use std::fmt;

/// Dense ligand index, `0..N`.
pub type LigandId = usize;

/// Dense pose index within one ligand, `0..K`.
pub type PoseId = usize;

/// A pose identified across the whole problem: the owning ligand plus its ligand-local index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniquePoseId {
    pub ligand_id: LigandId,
    pub pose_id: PoseId,
}

impl UniquePoseId {
    pub const fn new(ligand_id: LigandId, pose_id: PoseId) -> Self {
        Self { ligand_id, pose_id }
    }
}

impl fmt::Display for UniquePoseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}:P{}", self.ligand_id, self.pose_id)
    }
}
