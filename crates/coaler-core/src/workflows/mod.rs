//! # Workflows Module
//!
//! High-level entry points that run the complete alignment pipeline.
//!
//! - **Multiple Ligand Alignment** ([`align`]) - score matrix construction, pose register
//!   building, bounded multi-start seeding and parallel local-search refinement.

pub mod align;
