//! # Engine Module
//!
//! The stateful optimisation machinery behind multiple ligand alignment.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - starting-assembly bound, worker count, deficit policy
//! - **Score Matrix** ([`alignment`]) - canonical pose pair to compatibility score
//! - **Pose Registers** ([`registers`]) - best pose combination per ligand pair
//! - **Assemblies** ([`assembly`]) - the mutable ligand to pose assignment
//! - **Scoring** ([`scorer`]) - total assembly score and per-ligand score deficit
//! - **Candidate Ranking** ([`state`]) - bounded top-K pool of starting assemblies
//! - **Worker Pool** ([`pool`]) - per-aligner workers, rayon-backed with the `parallel` feature
//! - **Progress Monitoring** ([`progress`]) - optional callback for front ends
//! - **Error Handling** ([`error`]) - engine-specific errors
//!
//! The optimisation steps themselves (matrix construction, starting-assembly generation and
//! local search) live in [`tasks`].

pub mod alignment;
pub mod assembly;
pub mod config;
pub mod error;
pub mod pool;
pub mod progress;
pub mod registers;
pub mod scorer;
pub mod state;
pub mod tasks;
