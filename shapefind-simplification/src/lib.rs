//! Mesh simplification
//! 
//! This crate reduces mesh complexity to a face budget with shortest-edge
//! collapse. It shares no state with the descriptor pipeline and works on
//! any [`Mesh`].

pub mod edge_collapse;

pub use edge_collapse::*;

use shapefind_core::{Mesh, Result};

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Simplify mesh with target reduction ratio (0.0 = no reduction, 1.0 = maximum reduction)
    fn simplify(&self, mesh: &Mesh, reduction_ratio: f64) -> Result<Mesh>;
}
