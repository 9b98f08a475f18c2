use crate::core::models::ids::{LigandId, PoseId, UniquePoseId};
use std::collections::BTreeMap;

/// A (possibly partial) choice of one pose per ligand.
///
/// Every ligand owns an explicit optional slot, so "unassigned" can never collide with a real
/// pose index. `missing_ligands_count` starts at the number of ligands and drops each time a
/// previously empty slot receives a pose. Clones are deep; trial swaps during local search work
/// on their own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigandAlignmentAssembly {
    poses: Vec<Option<PoseId>>,
    missing_ligands_count: usize,
}

impl LigandAlignmentAssembly {
    pub fn new(num_ligands: usize) -> Self {
        Self {
            poses: vec![None; num_ligands],
            missing_ligands_count: num_ligands,
        }
    }

    pub fn from_mapping<I>(num_ligands: usize, mapping: I) -> Self
    where
        I: IntoIterator<Item = (LigandId, PoseId)>,
    {
        let mut assembly = Self::new(num_ligands);
        for (ligand_id, pose_id) in mapping {
            assembly.assign(ligand_id, pose_id);
        }
        assembly
    }

    #[inline]
    pub fn num_ligands(&self) -> usize {
        self.poses.len()
    }

    /// The chosen pose of a ligand, `None` while unassigned or for unknown ids.
    #[inline]
    pub fn pose_of(&self, ligand_id: LigandId) -> Option<PoseId> {
        self.poses.get(ligand_id).copied().flatten()
    }

    pub fn unique_pose_of(&self, ligand_id: LigandId) -> Option<UniquePoseId> {
        self.pose_of(ligand_id)
            .map(|pose_id| UniquePoseId::new(ligand_id, pose_id))
    }

    /// Inserts a pose only if the ligand has none yet. Returns whether the slot was filled.
    ///
    /// # Panics
    ///
    /// Panics if `ligand_id` is outside the assembly.
    pub fn insert(&mut self, ligand_id: LigandId, pose_id: PoseId) -> bool {
        let slot = self.slot_mut(ligand_id);
        if slot.is_some() {
            return false;
        }
        *slot = Some(pose_id);
        self.missing_ligands_count = self.missing_ligands_count.saturating_sub(1);
        true
    }

    /// Inserts or overwrites the pose of a ligand.
    ///
    /// # Panics
    ///
    /// Panics if `ligand_id` is outside the assembly.
    pub fn assign(&mut self, ligand_id: LigandId, pose_id: PoseId) {
        if !self.insert(ligand_id, pose_id) {
            *self.slot_mut(ligand_id) = Some(pose_id);
        }
    }

    fn slot_mut(&mut self, ligand_id: LigandId) -> &mut Option<PoseId> {
        let num_ligands = self.poses.len();
        self.poses.get_mut(ligand_id).unwrap_or_else(|| {
            panic!("ligand {ligand_id} is outside an assembly of {num_ligands} ligands")
        })
    }

    #[inline]
    pub fn missing_ligands_count(&self) -> usize {
        self.missing_ligands_count
    }

    pub fn assigned_count(&self) -> usize {
        self.poses.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_ligands_count == 0
    }

    /// Assigned `(ligand, pose)` entries in ligand id order.
    pub fn iter(&self) -> impl Iterator<Item = (LigandId, PoseId)> + Clone + '_ {
        self.poses
            .iter()
            .enumerate()
            .filter_map(|(ligand_id, slot)| slot.map(|pose_id| (ligand_id, pose_id)))
    }

    pub fn mapping(&self) -> BTreeMap<LigandId, PoseId> {
        self.iter().collect()
    }
}
