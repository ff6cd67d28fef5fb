//! Parsed configuration documents
//!
//! Provides [`Document`], the queryable tree every resolution layer reads
//! from. Paths are dotted (`workloads.SetOnly.ttl`) and walk nested tables.

use crate::error::DocumentError;
use crate::node::{Node, Table};
use std::path::Path;

/// Label used for documents parsed from in-memory text
const INLINE_ORIGIN: &str = "<inline>";

/// Parsed document tree
///
/// Read-only after construction. Cloning copies the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Top-level table
    root: toml::Table,
    /// File path or label, for diagnostics
    origin: String,
}

impl Document {
    /// Parse document text
    ///
    /// # Errors
    /// Returns `DocumentError::Parse` if the text is not valid TOML
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Self::parse_with_origin(text, INLINE_ORIGIN)
    }

    /// Parse document text, labelling it with `origin` in diagnostics
    ///
    /// # Errors
    /// Returns `DocumentError::Parse` if the text is not valid TOML
    pub fn parse_with_origin(text: &str, origin: impl Into<String>) -> Result<Self, DocumentError> {
        let origin = origin.into();
        match toml::from_str::<toml::Table>(text) {
            Ok(root) => Ok(Self { root, origin }),
            Err(source) => Err(DocumentError::parse_error(origin, source)),
        }
    }

    /// Read and parse a document file
    ///
    /// # Errors
    /// - `DocumentError::Io` if the file cannot be read
    /// - `DocumentError::Parse` if the file is not valid TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DocumentError::io_error(path, e))?;
        let doc = Self::parse_with_origin(&text, path.display().to_string())?;
        tracing::debug!("Loaded document {} ({} top-level keys)", doc.origin, doc.root.len());
        Ok(doc)
    }

    /// Empty document
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            root: toml::Table::new(),
            origin: INLINE_ORIGIN.to_string(),
        }
    }

    /// File path or label this document was read from
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Top-level table
    #[inline]
    #[must_use]
    pub fn root(&self) -> Table<'_> {
        Table::new(&self.root)
    }

    /// Top-level keys in declaration order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.root().keys().collect()
    }

    /// Check if any value exists at `path`
    #[inline]
    #[must_use]
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Check if a table exists at `path`
    ///
    /// Scalars and lists at `path` do not count.
    #[inline]
    #[must_use]
    pub fn has_table(&self, path: &str) -> bool {
        self.table(path).is_some()
    }

    /// Value at `path`
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Node<'_>> {
        self.root().lookup(path)
    }

    /// Table at `path`
    #[inline]
    #[must_use]
    pub fn table(&self, path: &str) -> Option<Table<'_>> {
        self.get(path).and_then(|node| node.as_table())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::str::FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
