//! # Core Models Module
//!
//! - [`ids`] - dense ligand/pose indices and the globally unique [`ids::UniquePoseId`]
//! - [`ligand`] - a ligand and its enumerable set of candidate poses
//! - [`pairs`] - canonical unordered pairs of ligands and of poses
//!
//! ```ignore
//! use coaler::core::models::{ligand::Ligand, pairs::PosePair};
//!
//! let first = Ligand::new(0, 3);
//! let second = Ligand::new(1, 2);
//! let pair = PosePair::new(first.poses()[2], second.poses()[0]);
//! ```

pub mod ids;
pub mod ligand;
pub mod pairs;
