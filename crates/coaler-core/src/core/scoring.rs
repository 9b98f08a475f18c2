use super::models::ids::UniquePoseId;
use super::models::pairs::PosePair;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("No compatibility score available for poses {first} and {second}: {reason}")]
    Unavailable {
        first: UniquePoseId,
        second: UniquePoseId,
        reason: String,
    },
    #[error("Compatibility score for poses {first} and {second} is not finite ({value})")]
    NonFinite {
        first: UniquePoseId,
        second: UniquePoseId,
        value: f64,
    },
    #[error("Compatibility score {value} for poses {first} and {second} lies outside [0, 1]")]
    OutOfRange {
        first: UniquePoseId,
        second: UniquePoseId,
        value: f64,
    },
}

/// Geometric compatibility of two poses belonging to different ligands.
///
/// Implementations must be symmetric, return values in `[0, 1]` (higher is more compatible,
/// e.g. one minus a shape Tanimoto distance) and be callable from several worker threads at
/// once. A pose pair that cannot be scored is reported as an error, never as zero.
pub trait PoseOracle: Sync {
    fn score(&self, first: UniquePoseId, second: UniquePoseId) -> Result<f64, ScoringError>;
}

impl<F> PoseOracle for F
where
    F: Fn(UniquePoseId, UniquePoseId) -> Result<f64, ScoringError> + Sync,
{
    fn score(&self, first: UniquePoseId, second: UniquePoseId) -> Result<f64, ScoringError> {
        self(first, second)
    }
}

/// Asks the oracle for the score of a canonical pair and rejects values a sane oracle never
/// produces.
pub fn checked_score(oracle: &dyn PoseOracle, pair: PosePair) -> Result<f64, ScoringError> {
    let (first, second) = (pair.first(), pair.second());
    let value = oracle.score(first, second)?;
    if !value.is_finite() {
        return Err(ScoringError::NonFinite {
            first,
            second,
            value,
        });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ScoringError::OutOfRange {
            first,
            second,
            value,
        });
    }
    Ok(value)
}

/// An oracle backed by precomputed scores, e.g. shape overlaps computed upstream.
#[derive(Debug, Default, Clone)]
pub struct PoseScoreTable {
    scores: HashMap<PosePair, f64>,
}

impl PoseScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: UniquePoseId, b: UniquePoseId, score: f64) -> Option<f64> {
        self.scores.insert(PosePair::new(a, b), score)
    }

    pub fn with_score(mut self, a: UniquePoseId, b: UniquePoseId, score: f64) -> Self {
        self.insert(a, b, score);
        self
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl PoseOracle for PoseScoreTable {
    fn score(&self, first: UniquePoseId, second: UniquePoseId) -> Result<f64, ScoringError> {
        let pair = PosePair::try_new(first, second).ok_or_else(|| ScoringError::Unavailable {
            first,
            second,
            reason: "poses belong to the same ligand".to_string(),
        })?;
        self.scores
            .get(&pair)
            .copied()
            .ok_or_else(|| ScoringError::Unavailable {
                first,
                second,
                reason: "pair missing from score table".to_string(),
            })
    }
}
