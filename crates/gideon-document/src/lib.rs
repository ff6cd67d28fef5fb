//! Gideon Documents
//!
//! Queryable configuration trees for Gideon test specifications.
//!
//! A [`Document`] wraps a parsed TOML file and answers dotted-path queries
//! (`phases.0.workloads`) with borrowed, tagged [`Node`] views. Key order
//! follows declaration order in the source text.
//!
//! # Example
//!
//! ```rust
//! use gideon_document::{Document, Node};
//!
//! let doc = Document::parse(
//!     r#"
//!     [workloads.SetOnly]
//!     set = 9
//!     "#,
//! )?;
//!
//! assert!(doc.has_table("workloads.SetOnly"));
//! assert!(matches!(doc.get("workloads.SetOnly.set"), Some(Node::Integer(9))));
//! # Ok::<(), gideon_document::DocumentError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod node;

pub use document::Document;
pub use error::DocumentError;
pub use node::{List, Node, NodeKind, Table};

/// Separator between segments of a dotted document path
pub const PATH_SEPARATOR: char = '.';
