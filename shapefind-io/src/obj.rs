//! OBJ format support
//!
//! Positions and faces only; texture coordinates, normals, groups and
//! materials are read past and dropped. Polygonal faces are kept as
//! polygons.

use crate::{MeshReader, MeshWriter};
use ::obj::ObjData;
use shapefind_core::{Error, Face, Mesh, Point3d, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// OBJ reader; positions are parsed at single precision (see [`ObjReader::read_from`])
pub struct ObjReader;
pub struct ObjWriter;

impl ObjReader {
    /// Parse an OBJ document from any reader.
    ///
    /// The `obj` crate parses positions as `f32`, so coordinates are rounded
    /// to single precision before being widened to `f64`. A reference mesh
    /// read back from OBJ will therefore score slightly above zero against a
    /// descriptor computed from its full precision source.
    pub fn read_from<R: Read>(reader: R) -> Result<Mesh> {
        let data = ObjData::load_buf(reader)
            .map_err(|e| Error::InvalidData(format!("OBJ parse error: {}", e)))?;

        let vertices: Vec<Point3d> = data
            .position
            .iter()
            .map(|p| Point3d::new(p[0] as f64, p[1] as f64, p[2] as f64))
            .collect();

        let faces: Vec<Face> = data
            .objects
            .iter()
            .flat_map(|object| object.groups.iter())
            .flat_map(|group| group.polys.iter())
            .map(|poly| Face::new(poly.0.iter().map(|tuple| tuple.0).collect::<Vec<_>>()))
            .collect();

        debug!(vertices = vertices.len(), faces = faces.len(), "parsed OBJ mesh");
        Ok(Mesh::from_vertices_and_faces(vertices, faces))
    }

    /// Serialise a mesh as OBJ text into any writer
    pub fn write_to<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
        ObjWriter::write_to(mesh, writer)
    }
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

impl ObjWriter {
    /// Serialise a mesh as OBJ text into any writer
    pub fn write_to<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
        for v in &mesh.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for face in &mesh.faces {
            // OBJ indices are 1-based
            let indices: Vec<String> = face
                .indices()
                .iter()
                .map(|idx| (idx + 1).to_string())
                .collect();
            writeln!(writer, "f {}", indices.join(" "))?;
        }
        Ok(())
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(mesh, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const QUAD_AND_TRIANGLE: &str = "\
# test model
o test
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
v 0.5 0.5 1.0
vn 0.0 0.0 1.0
f 1//1 2//1 3//1 4//1
f 1 2 5
";

    #[test]
    fn test_read_polygons_and_triangles() {
        let mesh = ObjReader::read_from(QUAD_AND_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[0].indices(), &[0, 1, 2, 3]);
        assert_eq!(mesh.faces[1].indices(), &[0, 1, 4]);
        assert_relative_eq!(mesh.vertices[4], Point3d::new(0.5, 0.5, 1.0));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_read_rejects_garbage() {
        let result = ObjReader::read_from("v 1.0 nope 2.0\n".as_bytes());
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_write_uses_one_based_indices() {
        let mesh = Mesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.5, 0.0, 0.0),
                Point3d::new(0.0, 2.0, 0.0),
                Point3d::new(0.0, 0.0, -1.0),
            ],
            vec![Face::new(vec![0, 1, 2, 3])],
        );
        let mut out = Vec::new();
        ObjWriter::write_to(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("v 1.5 0 0\n"));
        assert!(text.ends_with("f 1 2 3 4\n"));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.obj");

        let original = ObjReader::read_from(QUAD_AND_TRIANGLE.as_bytes()).unwrap();
        ObjWriter::write_mesh(&original, &path).unwrap();
        let loaded = ObjReader::read_mesh(&path).unwrap();

        assert_eq!(loaded.faces, original.faces);
        for (a, b) in loaded.vertices.iter().zip(&original.vertices) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }
}
