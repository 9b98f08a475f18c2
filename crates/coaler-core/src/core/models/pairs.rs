use super::ids::{LigandId, PoseId, UniquePoseId};
use std::fmt;

/// An unordered pair of two distinct ligands, stored with the lower id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LigandPair {
    first: LigandId,
    second: LigandId,
}

impl LigandPair {
    /// # Panics
    ///
    /// Panics if both ids are equal; a ligand never pairs with itself.
    pub fn new(a: LigandId, b: LigandId) -> Self {
        assert_ne!(a, b, "a ligand pair requires two distinct ligands");
        if a < b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    #[inline]
    pub fn first(&self) -> LigandId {
        self.first
    }

    #[inline]
    pub fn second(&self) -> LigandId {
        self.second
    }
}

impl fmt::Display for LigandPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// An unordered pair of poses from two different ligands; the key of the score matrix.
///
/// The pose of the ligand with the lower id is always stored first, so `(a, b)` and `(b, a)`
/// build identical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PosePair {
    first: UniquePoseId,
    second: UniquePoseId,
}

impl PosePair {
    /// # Panics
    ///
    /// Panics if both poses belong to the same ligand.
    pub fn new(a: UniquePoseId, b: UniquePoseId) -> Self {
        Self::try_new(a, b).unwrap_or_else(|| {
            panic!("poses {a} and {b} belong to the same ligand and cannot form a pair")
        })
    }

    pub fn try_new(a: UniquePoseId, b: UniquePoseId) -> Option<Self> {
        match a.ligand_id.cmp(&b.ligand_id) {
            std::cmp::Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[inline]
    pub fn first(&self) -> UniquePoseId {
        self.first
    }

    #[inline]
    pub fn second(&self) -> UniquePoseId {
        self.second
    }

    pub fn ligands(&self) -> LigandPair {
        LigandPair {
            first: self.first.ligand_id,
            second: self.second.ligand_id,
        }
    }

    pub fn pose_of(&self, ligand_id: LigandId) -> Option<PoseId> {
        if self.first.ligand_id == ligand_id {
            Some(self.first.pose_id)
        } else if self.second.ligand_id == ligand_id {
            Some(self.second.pose_id)
        } else {
            None
        }
    }
}

impl fmt::Display for PosePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ~ {}]", self.first, self.second)
    }
}
