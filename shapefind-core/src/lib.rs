//! Core data structures and traits for shapefind
//! 
//! This crate provides the fundamental types shared by the descriptor,
//! I/O and simplification crates: points, faces, meshes, the mesh accessor
//! trait and the common error type.

pub mod point;
pub mod mesh;
pub mod traits;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{self, Point3, Vector3, Matrix3};
