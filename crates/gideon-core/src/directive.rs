//! Directive resolution
//!
//! Turns a dotted path such as `phases.0` or `workloads.SetOnly` into a fully
//! populated [`Directive`] by layering, least specific first:
//!
//! 1. the [`DefaultsRegistry`] prototype for the path's root,
//! 2. the base document's top-level table for that root,
//! 3. the test document's table at every prefix `path[0:i]`, `i >= 2`.
//!
//! A missing prefix does not stop resolution: later prefixes are still
//! applied, and the first missing one is reported together with the
//! best-effort directive. A type mismatch in any layer stops immediately.

use crate::defaults::DefaultsRegistry;
use crate::error::ResolveError;
use crate::hydrate::hydrate;
use crate::model::{Directive, DirectiveRoot, Phase, Workload};
use gideon_document::{Document, Table, PATH_SEPARATOR};
use std::fmt::{self, Display, Formatter};

/// Parsed dotted directive path
///
/// Always has a known root and at least two segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectivePath {
    root: DirectiveRoot,
    segments: Vec<String>,
}

impl DirectivePath {
    /// Parse and validate a dotted path
    ///
    /// # Errors
    /// - `ResolveError::UnknownRoot` if the first segment is not `workloads` or `phases`
    /// - `ResolveError::InvalidPath` if the path has fewer than two segments
    pub fn parse(path: &str) -> Result<Self, ResolveError> {
        let segments: Vec<String> = path.split(PATH_SEPARATOR).map(str::to_string).collect();

        let first = segments.first().map_or("", String::as_str);
        let root = DirectiveRoot::from_segment(first).ok_or_else(|| ResolveError::UnknownRoot {
            path: path.to_string(),
            root: first.to_string(),
        })?;

        if segments.len() < 2 {
            return Err(ResolveError::InvalidPath {
                path: path.to_string(),
            });
        }

        Ok(Self { root, segments })
    }

    /// Directive root (first segment)
    #[inline]
    #[must_use]
    pub fn root(&self) -> DirectiveRoot {
        self.root
    }

    /// Path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a parsed path has at least two segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Prefixes `path[0:i]` for `i` in `2..=len`, least specific first
    pub fn prefixes(&self) -> impl Iterator<Item = String> + '_ {
        (2..=self.segments.len()).map(move |i| self.segments[..i].join("."))
    }
}

impl Display for DirectivePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl std::str::FromStr for DirectivePath {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Resolves dotted paths against defaults, base and test documents
#[derive(Debug, Clone, Copy)]
pub struct DirectiveResolver<'a> {
    registry: &'a DefaultsRegistry,
    base: &'a Document,
    spec: &'a Document,
}

impl<'a> DirectiveResolver<'a> {
    /// Create resolver over the given layers
    #[inline]
    #[must_use]
    pub fn new(registry: &'a DefaultsRegistry, base: &'a Document, spec: &'a Document) -> Self {
        Self { registry, base, spec }
    }

    /// Test document this resolver reads overrides from
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &'a Document {
        self.spec
    }

    /// Resolve a dotted path into a directive
    ///
    /// # Errors
    /// - `ResolveError::UnknownRoot` / `ResolveError::InvalidPath` for malformed paths
    /// - `ResolveError::MissingDirective` if some prefix has no table in the
    ///   test document; carries the best-effort directive
    /// - `ResolveError::Hydrate` if a layer has a mismatched value
    pub fn resolve(&self, path: &str) -> Result<Directive, ResolveError> {
        let path = DirectivePath::parse(path)?;
        let mut directive = self.seed(path.root())?;
        let mut first_missing = None;

        for prefix in path.prefixes() {
            match self.spec.table(&prefix) {
                Some(table) => {
                    apply_layer(&mut directive, &prefix, table)?;
                    tracing::debug!("Applied directive {} to {}", prefix, path);
                }
                None => {
                    tracing::debug!("Missing directive {} while resolving {}", prefix, path);
                    first_missing.get_or_insert(prefix);
                }
            }
        }

        match first_missing {
            Some(missing) => Err(ResolveError::MissingDirective {
                path: missing,
                requested: path.to_string(),
                partial: Box::new(directive),
            }),
            None => Ok(directive),
        }
    }

    /// Resolve a path that must produce a workload
    ///
    /// # Errors
    /// Same as [`resolve`](Self::resolve), plus `ResolveError::UnexpectedKind`
    /// if the path resolves to a phase
    pub fn resolve_workload(&self, path: &str) -> Result<Workload, ResolveError> {
        self.resolve(path)?
            .into_workload()
            .map_err(|other| unexpected(path, "workload", &other))
    }

    /// Resolve a path that must produce a phase
    ///
    /// # Errors
    /// Same as [`resolve`](Self::resolve), plus `ResolveError::UnexpectedKind`
    /// if the path resolves to a workload
    pub fn resolve_phase(&self, path: &str) -> Result<Phase, ResolveError> {
        self.resolve(path)?
            .into_phase()
            .map_err(|other| unexpected(path, "phase", &other))
    }

    /// Prototype for `root`, overridden by the base document's root table
    fn seed(&self, root: DirectiveRoot) -> Result<Directive, ResolveError> {
        let mut directive = match root {
            DirectiveRoot::Workloads => Directive::Workload(self.registry.seed_workload()),
            DirectiveRoot::Phases => Directive::Phase(self.registry.seed_phase()),
        };

        if let Some(table) = self.base.table(root.as_str()) {
            apply_layer(&mut directive, root.as_str(), table)?;
        }
        Ok(directive)
    }
}

fn apply_layer(directive: &mut Directive, layer: &str, table: Table<'_>) -> Result<(), ResolveError> {
    let result = match directive {
        Directive::Workload(w) => hydrate(w, table),
        Directive::Phase(p) => hydrate(p, table),
    };
    result.map(drop).map_err(|source| ResolveError::Hydrate {
        path: layer.to_string(),
        source,
    })
}

fn unexpected(path: &str, expected: &'static str, found: &Directive) -> ResolveError {
    ResolveError::UnexpectedKind {
        path: path.to_string(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
        [workloads]
            set = 0
            ttl = 0
            opRate = 100

        [phases]
            workloads = [["workloads.", "buckets.*", "conditions."]]
            runtime = 30
    "#;

    struct Layers {
        registry: DefaultsRegistry,
        base: Document,
        spec: Document,
    }

    impl Layers {
        fn new(spec: &str) -> Self {
            let base = Document::parse(BASE).unwrap();
            Self {
                registry: DefaultsRegistry::from_document(&base).unwrap(),
                base,
                spec: Document::parse(spec).unwrap(),
            }
        }

        fn resolver(&self) -> DirectiveResolver<'_> {
            DirectiveResolver::new(&self.registry, &self.base, &self.spec)
        }
    }

    #[test]
    fn path_prefixes() {
        let path = DirectivePath::parse("phases.0.workloads.0").unwrap();
        let prefixes: Vec<_> = path.prefixes().collect();
        assert_eq!(prefixes, vec!["phases.0", "phases.0.workloads", "phases.0.workloads.0"]);
        assert_eq!(path.to_string(), "phases.0.workloads.0");
        assert_eq!(path.len(), 4);
        assert!(!path.is_empty());
    }

    #[test]
    fn bare_root_is_invalid() {
        let err = DirectivePath::parse("workloads").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPath { .. }));
    }

    #[test]
    fn unknown_root() {
        let err = DirectivePath::parse("nodes.0").unwrap_err();
        assert!(matches!(err, ResolveError::UnknownRoot { ref root, .. } if root == "nodes"));
    }

    #[test]
    fn resolves_workload_override() {
        let layers = Layers::new("[workloads.foo]\nttl = 15\n");
        let w = layers.resolver().resolve_workload("workloads.foo").unwrap();

        assert_eq!(w.ttl, 15);
        assert_eq!(w.op_rate, 100);
        assert_eq!(w.set, 0);
    }

    #[test]
    fn resolves_phase_rows() {
        let layers = Layers::new("[phases.0]\nworkloads = [[\"SetOnly\"]]\n");
        let phase = layers.resolver().resolve_phase("phases.0").unwrap();

        assert_eq!(phase.workloads[0][0], "SetOnly");
        assert_eq!(phase.workloads.len(), 1);
        assert_eq!(phase.runtime, 30);
        assert!(phase.tasks().is_empty());
    }

    #[test]
    fn missing_prefix_reports_first_and_keeps_seed() {
        let layers = Layers::new("[workloads.other]\nset = 1\n");
        let err = layers.resolver().resolve("workloads.foo.bar").unwrap_err();

        match err {
            ResolveError::MissingDirective { path, requested, partial } => {
                assert_eq!(path, "workloads.foo");
                assert_eq!(requested, "workloads.foo.bar");
                let w = partial.as_workload().unwrap();
                assert_eq!((w.set, w.op_rate), (0, 100));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn deeper_prefixes_override_shallower_ones() {
        let layers = Layers::new(
            "[workloads.foo]\nset = 1\nttl = 7\n[workloads.foo.bar]\nset = 2\n",
        );
        let w = layers.resolver().resolve_workload("workloads.foo.bar").unwrap();
        assert_eq!((w.set, w.ttl, w.op_rate), (2, 7, 100));
    }

    #[test]
    fn nested_table_under_list_field_is_a_mismatch() {
        let layers = Layers::new("[phases.0.workloads.0]\nruntime = 5\n");
        let err = layers.resolver().resolve("phases.0.workloads.0").unwrap_err();
        assert!(matches!(err, ResolveError::Hydrate { ref path, .. } if path == "phases.0"));
    }

    #[test]
    fn scalar_at_prefix_counts_as_missing() {
        let layers = Layers::new("[workloads]\nfoo = 3\n");
        let err = layers.resolver().resolve("workloads.foo").unwrap_err();
        assert!(matches!(err, ResolveError::MissingDirective { ref path, .. } if path == "workloads.foo"));
    }

    #[test]
    fn mismatch_in_layer_stops_resolution() {
        let layers = Layers::new("[workloads.foo]\nttl = \"soon\"\n");
        let err = layers.resolver().resolve("workloads.foo").unwrap_err();
        assert!(matches!(err, ResolveError::Hydrate { ref path, .. } if path == "workloads.foo"));
    }

    #[test]
    fn kind_mismatch_for_typed_resolution() {
        let layers = Layers::new("[phases.0]\nruntime = 1\n");
        let err = layers.resolver().resolve_workload("phases.0").unwrap_err();
        assert!(matches!(err, ResolveError::UnexpectedKind { expected: "workload", found: "phase", .. }));
    }

    #[test]
    fn resolutions_are_independent() {
        let layers = Layers::new("[workloads.a]\nset = 1\n[workloads.b]\nget = 2\n");
        let resolver = layers.resolver();
        let a = resolver.resolve_workload("workloads.a").unwrap();
        let b = resolver.resolve_workload("workloads.b").unwrap();

        assert_eq!((a.set, a.get), (1, 0));
        assert_eq!((b.set, b.get), (0, 2));
        assert_eq!(layers.registry.workload().unwrap().set, 0);
    }
}
