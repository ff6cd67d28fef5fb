//! Error types for document loading

use std::path::PathBuf;

/// Errors while loading or parsing a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// IO error during file read
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Document text is not valid TOML
    #[error("syntax error in {origin}: {source}")]
    Parse {
        /// Path or label of the offending document
        origin: String,
        /// Underlying parser error
        #[source]
        source: toml::de::Error,
    },
}

impl DocumentError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create parse error for a document origin
    pub fn parse_error(origin: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Parse {
            origin: origin.into(),
            source,
        }
    }
}
