//! I/O operations for meshes and descriptor databases
//! 
//! This crate is the mesh accessor side of shapefind: it reads and writes
//! Wavefront OBJ meshes and loads the precomputed reference descriptor
//! database that queries are ranked against.

pub mod obj;
pub mod database;

pub use database::{load_database, parse_database, read_database};
pub use crate::obj::{ObjReader, ObjWriter};

use shapefind_core::{Error, Mesh, Result};
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()>;
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    match extension_of(path).as_deref() {
        Some("obj") => ObjReader::read_mesh(path),
        _ => Err(Error::UnsupportedFormat(
            format!("Unsupported mesh format: {:?}", path.extension())
        )),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match extension_of(path).as_deref() {
        Some("obj") => ObjWriter::write_mesh(mesh, path),
        _ => Err(Error::UnsupportedFormat(
            format!("Unsupported mesh format: {:?}", path.extension())
        )),
    }
}
