use super::config::ConfigError;
use crate::core::models::ids::LigandId;
use crate::core::scoring::ScoringError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ligand {ligand_id} has no candidate poses")]
    EmptyPoseSet { ligand_id: LigandId },

    #[error("Ligand ids must be dense: expected id {expected}, found {actual}")]
    NonDenseLigandIds {
        expected: LigandId,
        actual: LigandId,
    },

    #[error("Compatibility scoring failed: {source}")]
    Scoring {
        #[from]
        source: ScoringError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("No starting assembly could be generated from the candidate poses")]
    NoStartingAssembly,

    #[error("Internal logic error: {0}")]
    Internal(String),
}
