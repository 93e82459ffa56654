//! # shapefind descriptors
//!
//! Shape descriptor extraction and similarity ranking.
//!
//! A [`Descriptor`] summarises a mesh with a face-area weighted inertia
//! tensor and two statistics of the vertices' projection onto a reference
//! axis. The [`SimilarityRanker`] compares a query descriptor against a
//! [`DescriptorDatabase`] and returns the closest reference meshes.

pub mod config;
pub mod database;
pub mod descriptor;
pub mod extract;
pub mod ranking;

// Re-export commonly used items
pub use config::*;
pub use database::*;
pub use descriptor::*;
pub use extract::*;
pub use ranking::*;
