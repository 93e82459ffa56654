//! Shape descriptor extraction
//!
//! A descriptor combines a discretised moment of inertia tensor with two
//! statistics of the vertices' distance along a reference axis. The tensor
//! treats every face as a point mass at its centroid, weighted by its area,
//! which approximates (but is not) a volumetric inertia integral.

use crate::{Descriptor, SearchConfig};
use nalgebra::{Matrix3, Unit};
use shapefind_core::{centroid, validate_structure, Error, MeshAccessor, Point3d, Result, Vector3d};
use tracing::{debug, warn};

/// Inertia tensor together with the number of faces that did not contribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaTensor {
    pub matrix: Matrix3<f64>,
    /// Faces with zero area, skipped without error
    pub degenerate_faces: usize,
}

/// Mean and population variance of `|v · axis|` over all vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStatistics {
    pub average_distance: f64,
    pub distance_variance: f64,
}

/// Arithmetic mean of the vertex positions, each vertex weighted equally
pub fn vertex_centroid(vertices: &[Point3d]) -> Result<Point3d> {
    centroid(vertices).ok_or_else(|| Error::malformed("centroid of an empty vertex list is undefined"))
}

/// Accumulate `area_f * (|d_f|² I - d_f ⊗ d_f)` over all faces, where `d_f`
/// runs from the vertex centroid to the centroid of face `f`.
///
/// Only the first three indices of each face are used, so the trailing
/// corners of a polygon are ignored rather than triangulated.
pub fn compute_inertia_tensor<M: MeshAccessor + ?Sized>(mesh: &M) -> Result<InertiaTensor> {
    let vertices = mesh.vertices();
    let faces = mesh.faces();
    validate_structure(vertices, faces)?;

    let center = vertex_centroid(vertices)?;
    let identity = Matrix3::<f64>::identity();
    let mut matrix = Matrix3::<f64>::zeros();
    let mut degenerate_faces = 0usize;

    for face in faces {
        let [i1, i2, i3] = face
            .leading_triangle()
            .ok_or_else(|| Error::malformed("face with fewer than 3 indices"))?;
        let (v1, v2, v3) = (vertices[i1], vertices[i2], vertices[i3]);

        let normal = (v2 - v1).cross(&(v3 - v1));
        let area = normal.norm() / 2.0;
        if area == 0.0 {
            degenerate_faces += 1;
            continue;
        }

        let face_centroid = (v1.coords + v2.coords + v3.coords) / 3.0;
        let d = face_centroid - center.coords;
        matrix += (identity * d.dot(&d) - d * d.transpose()) * area;
    }

    Ok(InertiaTensor {
        matrix,
        degenerate_faces,
    })
}

/// Statistics of the absolute projection of every vertex onto `axis`.
pub fn compute_axis_statistics(vertices: &[Point3d], axis: &Unit<Vector3d>) -> Result<AxisStatistics> {
    if vertices.is_empty() {
        return Err(Error::malformed("axis statistics need at least one vertex"));
    }

    let axis = axis.into_inner();
    let n = vertices.len() as f64;
    let distances: Vec<f64> = vertices
        .iter()
        .map(|v| v.coords.dot(&axis).abs())
        .collect();

    let average_distance = distances.iter().sum::<f64>() / n;
    let distance_variance = distances
        .iter()
        .map(|d| (d - average_distance).powi(2))
        .sum::<f64>()
        / n;

    Ok(AxisStatistics {
        average_distance,
        distance_variance,
    })
}

/// Compute the full descriptor of a mesh against the configured axis.
///
/// Fails with [`Error::MalformedMesh`] when the mesh has no vertices, no
/// faces, a non-finite coordinate, a face with fewer than three indices or
/// an out-of-range index, and when the result itself is not finite.
/// Zero-area faces are tolerated and only reported through a warning.
pub fn compute_descriptor<M: MeshAccessor + ?Sized>(mesh: &M, config: &SearchConfig) -> Result<Descriptor> {
    let inertia = compute_inertia_tensor(mesh)?;
    if inertia.degenerate_faces > 0 {
        warn!(
            degenerate = inertia.degenerate_faces,
            faces = mesh.faces().len(),
            "skipped zero-area faces while accumulating the inertia tensor"
        );
    }

    let stats = compute_axis_statistics(mesh.vertices(), &config.axis)?;
    debug!(
        vertices = mesh.vertices().len(),
        faces = mesh.faces().len(),
        average_distance = stats.average_distance,
        distance_variance = stats.distance_variance,
        "computed shape descriptor"
    );

    let descriptor = Descriptor::new(inertia.matrix, stats.average_distance, stats.distance_variance);
    if !descriptor.is_finite() {
        // Finite but huge coordinates can still overflow the squared terms
        return Err(Error::malformed(
            "descriptor overflowed; vertex coordinates are too large",
        ));
    }
    Ok(descriptor)
}
