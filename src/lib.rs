//! # shapefind
//!
//! 3D model shape-similarity search for Rust.
//!
//! This is the umbrella crate that ties the shapefind crates together. A
//! query mesh is summarised by a shape descriptor (moment of inertia tensor
//! plus two statistics of the vertices' distance along a reference axis),
//! compared against a precomputed database of reference descriptors, and
//! the closest reference meshes are returned.
//!
//! ## Features
//!
//! - **Core**: mesh types, the `MeshAccessor` trait and the shared error type
//! - **Descriptors**: descriptor extraction and similarity ranking
//! - **I/O**: OBJ meshes and the JSON descriptor database
//! - **Simplification**: edge-collapse mesh reduction to a face budget
//!
//! ## Quick Start
//!
//! ```rust
//! use shapefind::prelude::*;
//! use shapefind::nalgebra::Matrix3;
//!
//! let mesh = Mesh::from_triangles(
//!     vec![
//!         Point3d::new(0.0, 0.0, 0.0),
//!         Point3d::new(1.0, 0.0, 0.0),
//!         Point3d::new(0.0, 1.0, 0.0),
//!         Point3d::new(0.0, 0.0, 1.0),
//!     ],
//!     vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
//! );
//!
//! let database: DescriptorDatabase = vec![
//!     DatabaseEntry::new("empty", Descriptor::new(Matrix3::zeros(), 0.0, 0.0)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let context = SearchContext::new(SearchConfig::default(), database);
//! let matches = context.search(&mesh).unwrap();
//! assert_eq!(matches[0].id, "empty");
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables io and simplification
//! - `io`: OBJ meshes and descriptor database loading
//! - `simplification`: Mesh simplification

// Re-export core functionality
pub use shapefind_core::*;
pub use shapefind_descriptors as descriptors;

#[cfg(feature = "io")]
pub use shapefind_io as io;

#[cfg(feature = "simplification")]
pub use shapefind_simplification as simplification;

use shapefind_descriptors::{compute_descriptor, Descriptor, DescriptorDatabase, Match, SearchConfig, SimilarityRanker};
use tracing::warn;

/// Everything a similarity query needs: the configuration and an immutable
/// view of the reference database.
///
/// A context holds no mutable state, so one instance can serve any number
/// of concurrent queries by shared reference.
#[derive(Debug, Clone)]
pub struct SearchContext {
    config: SearchConfig,
    database: DescriptorDatabase,
}

impl SearchContext {
    pub fn new(config: SearchConfig, database: DescriptorDatabase) -> Self {
        if let Some(axis) = database.axis() {
            let configured = config.axis.into_inner();
            let built_with = axis.normalize();
            let drift = (built_with - configured).norm();
            if drift.is_nan() || drift > 1e-9 {
                warn!(
                    configured = ?configured.as_slice(),
                    database = ?axis.as_slice(),
                    "descriptor database was built against a different axis; scores will not be comparable"
                );
            }
        }
        Self { config, database }
    }

    /// Load the database from a JSON file and wrap it in a context
    #[cfg(feature = "io")]
    pub fn open<P: AsRef<std::path::Path>>(config: SearchConfig, path: P) -> Result<Self> {
        let database = shapefind_io::load_database(path)?;
        Ok(Self::new(config, database))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn database(&self) -> &DescriptorDatabase {
        &self.database
    }

    /// Descriptor of `mesh` under this context's axis
    pub fn describe<M: MeshAccessor + ?Sized>(&self, mesh: &M) -> Result<Descriptor> {
        compute_descriptor(mesh, &self.config)
    }

    /// Rank the database against `mesh`, most similar first
    pub fn search<M: MeshAccessor + ?Sized>(&self, mesh: &M) -> Result<Vec<Match>> {
        let query = self.describe(mesh)?;
        self.search_descriptor(&query)
    }

    /// Rank the database against an already computed descriptor
    pub fn search_descriptor(&self, query: &Descriptor) -> Result<Vec<Match>> {
        SimilarityRanker::from_config(&self.config).rank(query, &self.database)
    }

    /// Read a mesh file and rank the database against it
    #[cfg(feature = "io")]
    pub fn search_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<Vec<Match>> {
        let mesh = shapefind_io::read_mesh(path)?;
        self.search(&mesh)
    }
}

/// Convenient imports for common use cases
pub mod prelude {
    pub use shapefind_core::*;
    pub use shapefind_descriptors::*;
    pub use crate::SearchContext;

    #[cfg(feature = "io")]
    pub use shapefind_io::{load_database, parse_database, read_mesh, write_mesh, MeshReader, MeshWriter};

    #[cfg(feature = "simplification")]
    pub use shapefind_simplification::*;
}
