//! Search configuration

use nalgebra::Unit;
use shapefind_core::{Error, Result, Vector3d};

/// Explicit configuration shared by descriptor extraction and ranking.
///
/// The reference axis is a fixed world-space direction, not one derived
/// from the mesh, so descriptors change under rotation and translation.
/// Database and query descriptors are only comparable when both were
/// computed against the same axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Unit axis the vertex projections are taken against
    pub axis: Unit<Vector3d>,
    /// Number of matches returned by a query
    pub top_k: usize,
}

impl SearchConfig {
    pub const DEFAULT_TOP_K: usize = 10;

    /// Build a config from a raw axis (normalised here) and a result count.
    pub fn new(axis: Vector3d, top_k: usize) -> Result<Self> {
        Ok(Self {
            axis: normalize_axis(axis)?,
            top_k,
        })
    }

    /// Replace the axis, normalising it
    pub fn with_axis(mut self, axis: Vector3d) -> Result<Self> {
        self.axis = normalize_axis(axis)?;
        Ok(self)
    }

    /// Replace the number of returned matches
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            axis: Vector3d::x_axis(),
            top_k: Self::DEFAULT_TOP_K,
        }
    }
}

fn normalize_axis(axis: Vector3d) -> Result<Unit<Vector3d>> {
    if !axis.iter().all(|c| c.is_finite()) {
        return Err(Error::InvalidConfig(format!(
            "axis {:?} has non-finite components",
            axis.as_slice()
        )));
    }
    Unit::try_new(axis, f64::EPSILON).ok_or_else(|| {
        Error::InvalidConfig("axis must have a non-zero length".to_string())
    })
}
