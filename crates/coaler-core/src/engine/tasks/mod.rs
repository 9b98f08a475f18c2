//! Optimisation tasks.
//!
//! Each submodule implements one step of multiple ligand alignment: building the pairwise score
//! matrix, generating a starting assembly from a seed pose, and refining an assembly by local
//! search. Tasks take their collaborators by reference and own no state between calls.

pub mod local_search;
pub mod pairwise_scores;
pub mod starting_assembly;
