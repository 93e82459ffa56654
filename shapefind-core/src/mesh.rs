//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// An ordered tuple of vertex indices describing one (possibly polygonal) face
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face(pub Vec<usize>);

impl Face {
    /// Create a face from any list of vertex indices
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    /// Vertex indices of the face
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of corners
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first three indices of the face.
    ///
    /// Polygons with more than three corners are *not* triangulated here:
    /// everything after the third index is ignored.
    pub fn leading_triangle(&self) -> Option<[usize; 3]> {
        match self.0.as_slice() {
            [a, b, c, ..] => Some([*a, *b, *c]),
            _ => None,
        }
    }

    /// Fan triangulation around the first corner
    pub fn fan_triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let first = self.0.first().copied().unwrap_or_default();
        self.0
            .windows(2)
            .skip(1)
            .map(move |pair| [first, pair[0], pair[1]])
    }
}

impl From<[usize; 3]> for Face {
    fn from(triangle: [usize; 3]) -> Self {
        Self(triangle.to_vec())
    }
}

impl From<Vec<usize>> for Face {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// A polygon mesh: an ordered vertex list and faces indexing into it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3d>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Create a triangle mesh from vertices and index triples
    pub fn from_triangles(vertices: Vec<Point3d>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces: triangles.into_iter().map(Face::from).collect(),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3d) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: impl Into<Face>) {
        self.faces.push(face.into());
    }

    /// Check the structural invariants every consumer relies on.
    ///
    /// Degenerate geometry is accepted; only counts, coordinates and indices
    /// are checked.
    pub fn validate(&self) -> Result<()> {
        validate_structure(&self.vertices, &self.faces)
    }
}

/// Structural validation shared by [`Mesh::validate`] and any other
/// vertex/face source: at least one vertex and one face, finite vertex
/// coordinates, every face has at least three corners and only references
/// existing vertices.
pub fn validate_structure(vertices: &[Point3d], faces: &[Face]) -> Result<()> {
    if vertices.is_empty() {
        return Err(Error::malformed("mesh has no vertices"));
    }
    if let Some((vi, v)) = vertices
        .iter()
        .enumerate()
        .find(|(_, v)| !v.coords.iter().all(|c| c.is_finite()))
    {
        return Err(Error::malformed(format!(
            "vertex {} has non-finite coordinates ({}, {}, {})",
            vi, v.x, v.y, v.z
        )));
    }
    if faces.is_empty() {
        return Err(Error::malformed("mesh has no faces"));
    }
    let vertex_count = vertices.len();
    for (fi, face) in faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(Error::malformed(format!(
                "face {} has {} vertex indices, at least 3 are required",
                fi,
                face.len()
            )));
        }
        if let Some(&bad) = face.indices().iter().find(|&&idx| idx >= vertex_count) {
            return Err(Error::malformed(format!(
                "face {} references vertex {} but the mesh has {} vertices",
                fi, bad, vertex_count
            )));
        }
    }
    Ok(())
}
