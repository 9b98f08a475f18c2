//! # CoAler Core Library
//!
//! Multiple ligand alignment by assignment: every ligand brings a set of candidate poses, and the
//! library picks exactly one pose per ligand so that the summed pairwise compatibility of the
//! chosen poses is as high as a multi-start local search can make it.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless identifiers and models (`Ligand`, `UniquePoseId`,
//!   `PosePair`) and the [`core::scoring::PoseOracle`] trait through which the geometric
//!   similarity of two poses is obtained.
//!
//! - **[`engine`]: The Logic Core.** The pairwise score matrix, pose registers, the mutable
//!   `LigandAlignmentAssembly`, the `AssemblyScorer` and the optimisation tasks (matrix
//!   construction, starting-assembly generation, local search).
//!
//! - **[`workflows`]: The Public API.** [`workflows::align::MultiAligner`] ties everything
//!   together and returns a [`workflows::align::MultiAlignerResult`].

pub mod core;
pub mod engine;
pub mod workflows;
