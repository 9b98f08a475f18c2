//! # Core Module
//!
//! Stateless building blocks shared by the optimisation engine.
//!
//! - **Identifiers and models** ([`models`]) - ligand and pose identities, canonical pairs
//! - **Compatibility scoring** ([`scoring`]) - the oracle contract turning two poses into a score
//!
//! Nothing in this module owns optimisation state; the geometry behind a pose is opaque and is
//! only ever reached through a [`scoring::PoseOracle`].

pub mod models;
pub mod scoring;
