//! Error types for shapefind

use thiserror::Error;

/// Main error type for shapefind operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed mesh: {0}")]
    MalformedMesh(String),

    #[error("Descriptor database unavailable: {0}")]
    DatabaseUnavailable(String),

    #[error("Invalid database entry #{index} ({id}): {reason}")]
    InvalidDatabaseEntry {
        index: usize,
        id: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Shorthand for [`Error::MalformedMesh`]
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::MalformedMesh(details.into())
    }

    /// Shorthand for [`Error::InvalidDatabaseEntry`]
    pub fn invalid_entry(index: usize, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDatabaseEntry {
            index,
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for shapefind operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed("face 3 references vertex 9");
        assert!(err.to_string().contains("face 3 references vertex 9"));

        let err = Error::invalid_entry(2, "chair.obj", "inertia must be 3x3");
        let message = err.to_string();
        assert!(message.contains("#2"));
        assert!(message.contains("chair.obj"));
        assert!(message.contains("3x3"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
