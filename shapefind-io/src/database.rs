//! Descriptor database loading
//!
//! The database is a JSON document holding every reference descriptor
//! together with the identifier of the mesh it was computed from:
//!
//! ```json
//! {
//!   "axis": [1.0, 0.0, 0.0],
//!   "entries": [
//!     { "id": "chair.obj", "inertia": [[1,0,0],[0,1,0],[0,0,1]],
//!       "average_distance": 0.4, "distance_variance": 0.02 }
//!   ]
//! }
//! ```
//!
//! Building and persisting the database happens elsewhere; this module
//! only loads it, whole, as an immutable [`DescriptorDatabase`].

use shapefind_core::{Error, Result};
use shapefind_descriptors::{DatabaseFile, DescriptorDatabase};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Load a database file.
///
/// A missing, unreadable or non-JSON file, or one recording an unusable
/// axis, is reported as [`Error::DatabaseUnavailable`]; a readable file
/// with a malformed entry as [`Error::InvalidDatabaseEntry`].
pub fn load_database<P: AsRef<Path>>(path: P) -> Result<DescriptorDatabase> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::DatabaseUnavailable(format!("cannot open {}: {}", path.display(), e))
    })?;
    let database = read_database(BufReader::new(file))?;
    debug!(path = %path.display(), entries = database.len(), "loaded descriptor database");
    Ok(database)
}

/// Load a database from any reader
pub fn read_database<R: Read>(reader: R) -> Result<DescriptorDatabase> {
    let file: DatabaseFile = serde_json::from_reader(reader).map_err(corrupt)?;
    DescriptorDatabase::from_file(file)
}

/// Load a database from an in-memory JSON document
pub fn parse_database(text: &str) -> Result<DescriptorDatabase> {
    let file: DatabaseFile = serde_json::from_str(text).map_err(corrupt)?;
    DescriptorDatabase::from_file(file)
}

fn corrupt(e: serde_json::Error) -> Error {
    if e.is_io() {
        Error::DatabaseUnavailable(format!("cannot read descriptor database: {}", e))
    } else {
        Error::DatabaseUnavailable(format!("corrupt descriptor database: {}", e))
    }
}
