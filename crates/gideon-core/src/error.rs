//! Error types for Gideon Core
//!
//! Provides error handling for:
//! - Hydration (document values → typed fields)
//! - Directive resolution (dotted path → typed directive)
//! - Task linking (test spec → phase/task graph)
//! - Task execution

use crate::model::Directive;
use gideon_document::{DocumentError, NodeKind};

/// Errors while copying document values onto typed fields
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HydrateError {
    /// Value kind disagrees with the field's declared kind
    #[error("type mismatch for '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Overlay key, with element indices for nested values (`workloads[0][1]`)
        key: String,
        /// Kind the field accepts
        expected: &'static str,
        /// Kind found in the document
        found: NodeKind,
    },
}

impl HydrateError {
    /// Create type mismatch error
    pub fn mismatch(key: impl Into<String>, expected: &'static str, found: NodeKind) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            found,
        }
    }
}

/// Errors while resolving a dotted directive path
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// First path segment is not a known directive root
    #[error("unknown directive root '{root}' in '{path}'")]
    UnknownRoot {
        /// Requested path
        path: String,
        /// Offending first segment
        root: String,
    },

    /// Path has fewer than two segments
    #[error("invalid sub-directive '{path}': a bare root is not addressable")]
    InvalidPath {
        /// Requested path
        path: String,
    },

    /// No table at a prefix of the requested path
    ///
    /// Carries the best-effort directive built from every prefix that did exist.
    #[error("missing directive {path}")]
    MissingDirective {
        /// First missing prefix
        path: String,
        /// Full requested path
        requested: String,
        /// Best-effort directive
        partial: Box<Directive>,
    },

    /// A layer's value did not match a field's kind
    #[error("hydration failed at {path}: {source}")]
    Hydrate {
        /// Layer (document path) being applied
        path: String,
        /// Underlying mismatch
        #[source]
        source: HydrateError,
    },

    /// Path resolved to a different directive kind than the caller needs
    #[error("directive '{path}' is a {found}, expected a {expected}")]
    UnexpectedKind {
        /// Requested path
        path: String,
        /// Directive kind the caller needs
        expected: &'static str,
        /// Directive kind the path produced
        found: &'static str,
    },
}

impl ResolveError {
    /// Path reported by this error
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::UnknownRoot { path, .. }
            | Self::InvalidPath { path }
            | Self::MissingDirective { path, .. }
            | Self::Hydrate { path, .. }
            | Self::UnexpectedKind { path, .. } => path.as_str(),
        }
    }

    /// Best-effort directive, if resolution got far enough to build one
    #[must_use]
    pub fn partial(&self) -> Option<&Directive> {
        match self {
            Self::MissingDirective { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Errors while linking a test spec into phases and tasks
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Test document has no `[test]` table
    #[error("Test spec missing [test] directive")]
    MissingTestRoot,

    /// `test.phases` is absent or not a list of strings
    #[error("invalid test.phases: {0}")]
    InvalidPhaseList(String),

    /// Phase or workload directive failed to resolve
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Errors raised by a running task
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// Task reported failure
    #[error("task {path} failed: {reason}")]
    Failed {
        /// Task path (`workloads.SetOnly`)
        path: String,
        /// Human-readable reason
        reason: String,
    },
}

impl ExecutionError {
    /// Create task failure
    pub fn failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Combined Gideon error
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Document could not be loaded
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Defaults document section did not hydrate
    #[error("defaults section [{section}]: {source}")]
    Defaults {
        /// Section name (`workloads`, `phases`)
        section: &'static str,
        /// Underlying mismatch
        #[source]
        source: HydrateError,
    },

    /// Directive resolution failed
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Linking failed
    #[error("link error: {0}")]
    Link(#[from] LinkError),

    /// A task failed during the run
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),
}

impl SpecError {
    /// Check if the error is caused by an absent directive or `[test]` table
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::Resolve(ResolveError::MissingDirective { .. })
                | Self::Link(
                    LinkError::MissingTestRoot
                        | LinkError::Resolve(ResolveError::MissingDirective { .. })
                )
        )
    }

    /// Document path the error points at, if any
    #[must_use]
    pub fn offending_path(&self) -> Option<&str> {
        match self {
            Self::Resolve(e) | Self::Link(LinkError::Resolve(e)) => Some(e.path()),
            Self::Link(LinkError::MissingTestRoot | LinkError::InvalidPhaseList(_)) => {
                Some(crate::model::TEST)
            }
            Self::Defaults { section, .. } => Some(*section),
            Self::Execution(ExecutionError::Failed { path, .. }) => Some(path.as_str()),
            Self::Document(_) => None,
        }
    }
}

/// Result type alias for Gideon operations
pub type SpecResult<T> = Result<T, SpecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_test_root_display() {
        let err = LinkError::MissingTestRoot;
        assert_eq!(err.to_string(), "Test spec missing [test] directive");
    }

    #[test]
    fn mismatch_display() {
        let err = HydrateError::mismatch("ttl", "integer", NodeKind::String);
        assert_eq!(
            err.to_string(),
            "type mismatch for 'ttl': expected integer, found string"
        );
    }

    #[test]
    fn invalid_path_display() {
        let err = ResolveError::InvalidPath {
            path: "workloads".to_string(),
        };
        assert!(err.to_string().contains("invalid sub-directive 'workloads'"));
    }

    #[test]
    fn offending_path_through_link() {
        let err: SpecError = LinkError::Resolve(ResolveError::UnknownRoot {
            path: "nodes.0".to_string(),
            root: "nodes".to_string(),
        })
        .into();
        assert_eq!(err.offending_path(), Some("nodes.0"));
        assert!(!err.is_missing());
    }

    #[test]
    fn missing_test_root_is_missing() {
        let err: SpecError = LinkError::MissingTestRoot.into();
        assert!(err.is_missing());
        assert_eq!(err.offending_path(), Some("test"));
    }
}
