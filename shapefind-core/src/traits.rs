//! Core traits for shapefind

use crate::{mesh::*, point::*};

/// Read-only access to a mesh's vertex positions and faces.
///
/// Descriptor extraction only needs these two ordered sequences, so any
/// source (a parsed file, a procedural generator, a foreign buffer) can be
/// searched by implementing this trait.
pub trait MeshAccessor {
    /// Ordered vertex positions, indexed `0..N`
    fn vertices(&self) -> &[Point3d];

    /// Ordered faces, each indexing into [`MeshAccessor::vertices`]
    fn faces(&self) -> &[Face];
}

impl MeshAccessor for Mesh {
    fn vertices(&self) -> &[Point3d] {
        &self.vertices
    }

    fn faces(&self) -> &[Face] {
        &self.faces
    }
}

impl<T: MeshAccessor + ?Sized> MeshAccessor for &T {
    fn vertices(&self) -> &[Point3d] {
        (**self).vertices()
    }

    fn faces(&self) -> &[Face] {
        (**self).faces()
    }
}
