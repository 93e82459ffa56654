//! The shape descriptor record

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Fixed-shape numeric signature of one mesh.
///
/// Produced once per mesh by [`crate::compute_descriptor`] and never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Face-area weighted moment of inertia tensor about the vertex centroid
    pub inertia: Matrix3<f64>,
    /// Mean absolute projection of the vertices onto the reference axis
    pub average_distance: f64,
    /// Population variance of the same projections
    pub distance_variance: f64,
}

impl Descriptor {
    pub fn new(inertia: Matrix3<f64>, average_distance: f64, distance_variance: f64) -> Self {
        Self {
            inertia,
            average_distance,
            distance_variance,
        }
    }

    /// Build a descriptor from a row-major tensor of any declared shape.
    ///
    /// Returns a description of the problem when `rows` is not 3x3.
    pub fn from_rows(
        rows: &[Vec<f64>],
        average_distance: f64,
        distance_variance: f64,
    ) -> std::result::Result<Self, String> {
        if rows.len() != 3 {
            return Err(format!("inertia tensor has {} rows, expected 3", rows.len()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != 3) {
            return Err(format!(
                "inertia tensor row {} has {} columns, expected 3",
                i,
                row.len()
            ));
        }
        let inertia = Matrix3::from_fn(|r, c| rows[r][c]);
        Ok(Self::new(inertia, average_distance, distance_variance))
    }

    /// Row-major copy of the tensor
    pub fn inertia_rows(&self) -> [[f64; 3]; 3] {
        let m = &self.inertia;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    /// All eleven components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.inertia.iter().all(|v| v.is_finite())
            && self.average_distance.is_finite()
            && self.distance_variance.is_finite()
    }
}
