//! Test orchestration
//!
//! [`Test`] owns the defaults, base and test documents, the defaults
//! registry built from them, and the resolved phase set. [`Test::run`] links
//! the phase graph and then runs every phase's tasks.

use crate::defaults::DefaultsRegistry;
use crate::directive::DirectiveResolver;
use crate::error::SpecError;
use crate::link::TaskGraphLinker;
use crate::model::Phase;
use crate::runnable::{LoggingExecutor, Runnable, WorkloadExecutor};
use gideon_document::Document;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Default defaults/base document file name
pub const DEFAULTS_FILE: &str = "def.toml";

/// Default test document file name
pub const SPEC_FILE: &str = "simple.toml";

/// Where a test's documents are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    /// Document the defaults registry is built from
    pub defaults_path: PathBuf,
    /// Base document; the defaults document when unset
    pub base_path: Option<PathBuf>,
    /// Test document
    pub spec_path: PathBuf,
}

impl TestConfig {
    /// Config for a test document, with defaults read from `def.toml`
    #[inline]
    #[must_use]
    pub fn new(spec_path: impl Into<PathBuf>) -> Self {
        Self {
            spec_path: spec_path.into(),
            ..Self::default()
        }
    }

    /// With defaults document
    #[inline]
    #[must_use]
    pub fn with_defaults(mut self, path: impl Into<PathBuf>) -> Self {
        self.defaults_path = path.into();
        self
    }

    /// With base document distinct from the defaults document
    #[inline]
    #[must_use]
    pub fn with_base(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Effective base document path
    #[inline]
    #[must_use]
    pub fn base_path(&self) -> &Path {
        self.base_path.as_deref().unwrap_or(&self.defaults_path)
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            defaults_path: PathBuf::from(DEFAULTS_FILE),
            base_path: None,
            spec_path: PathBuf::from(SPEC_FILE),
        }
    }
}

/// Counts from a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Phases run
    pub phases: usize,
    /// Tasks run across all phases
    pub tasks: usize,
}

/// A loaded test specification
#[derive(Debug, Clone)]
pub struct Test {
    name: String,
    defaults: Document,
    base: Document,
    spec: Document,
    registry: DefaultsRegistry,
    phases: IndexMap<String, Phase>,
}

impl Test {
    /// Load every document named by `config`
    ///
    /// # Errors
    /// - `SpecError::Document` if a file cannot be read or parsed
    /// - `SpecError::Defaults` if the defaults document does not hydrate
    pub fn load(config: &TestConfig) -> Result<Self, SpecError> {
        let defaults = Document::load(&config.defaults_path)?;
        let base = if config.base_path() == config.defaults_path.as_path() {
            defaults.clone()
        } else {
            Document::load(config.base_path())?
        };
        let spec = Document::load(&config.spec_path)?;
        Self::from_documents(defaults, base, spec)
    }

    /// Build from already loaded documents
    ///
    /// # Errors
    /// Returns `SpecError::Defaults` if the defaults document does not hydrate
    pub fn from_documents(defaults: Document, base: Document, spec: Document) -> Result<Self, SpecError> {
        let registry = DefaultsRegistry::from_document(&defaults)?;
        Ok(Self {
            name: spec.origin().to_string(),
            defaults,
            base,
            spec,
            registry,
            phases: IndexMap::new(),
        })
    }

    /// Test name (the test document's origin)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Defaults document
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &Document {
        &self.defaults
    }

    /// Base document
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Document {
        &self.base
    }

    /// Test document
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &Document {
        &self.spec
    }

    /// Defaults registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &DefaultsRegistry {
        &self.registry
    }

    /// Linked phases keyed by name, in `test.phases` order
    #[inline]
    #[must_use]
    pub fn phases(&self) -> &IndexMap<String, Phase> {
        &self.phases
    }

    /// Linked phase by name
    #[inline]
    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.get(name)
    }

    /// Resolver over this test's documents
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> DirectiveResolver<'_> {
        DirectiveResolver::new(&self.registry, &self.base, &self.spec)
    }

    /// Link `test.phases` into the phase set without running anything
    ///
    /// Previously linked phases are discarded first.
    ///
    /// # Errors
    /// Returns `SpecError::Link` on the first phase or workload that fails
    pub fn link(&mut self) -> Result<(), SpecError> {
        self.phases.clear();
        let resolver = DirectiveResolver::new(&self.registry, &self.base, &self.spec);
        TaskGraphLinker::new(resolver).link_test_phases(&mut self.phases)?;
        Ok(())
    }

    /// Link and run with the logging executor
    ///
    /// # Errors
    /// See [`run_with`](Self::run_with)
    pub fn run(&mut self) -> Result<RunSummary, SpecError> {
        self.run_with(&LoggingExecutor)
    }

    /// Link, then run every phase's tasks through `executor`
    ///
    /// Nothing runs if linking fails. Phases run in `test.phases` order,
    /// tasks in workload row order.
    ///
    /// # Errors
    /// - `SpecError::Link` if linking fails
    /// - `SpecError::Execution` on the first failing task
    pub fn run_with(&mut self, executor: &dyn WorkloadExecutor) -> Result<RunSummary, SpecError> {
        self.link()?;

        let mut summary = RunSummary::default();
        for (name, phase) in &self.phases {
            phase.run(name, executor)?;
            summary.phases += 1;
            summary.tasks += phase.tasks().len();
        }

        tracing::info!(
            "Test {} finished: {} phases, {} tasks",
            self.name,
            summary.phases,
            summary.tasks
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TestConfig::default();
        assert_eq!(config.defaults_path, PathBuf::from("def.toml"));
        assert_eq!(config.base_path(), Path::new("def.toml"));
        assert_eq!(config.spec_path, PathBuf::from("simple.toml"));
    }

    #[test]
    fn config_builder() {
        let config = TestConfig::new("load.toml")
            .with_defaults("sys.toml")
            .with_base("base.toml");
        assert_eq!(config.spec_path, PathBuf::from("load.toml"));
        assert_eq!(config.defaults_path, PathBuf::from("sys.toml"));
        assert_eq!(config.base_path(), Path::new("base.toml"));
    }

    #[test]
    fn link_failure_runs_nothing() {
        let defaults = Document::parse("[workloads]\nset = 0\n").unwrap();
        let spec = Document::parse("[phases.0]\nworkloads = [[\"A\"]]\n").unwrap();
        let mut test = Test::from_documents(defaults.clone(), defaults, spec).unwrap();

        let err = test.run().unwrap_err();
        assert!(err.is_missing());
        assert!(test.phases().is_empty());
    }

    #[test]
    fn relinking_replaces_phases() {
        let defaults = Document::parse("[workloads]\nset = 0\n").unwrap();
        let spec = Document::parse(
            "[test]\nphases = [\"phases.0\"]\n[phases.0]\nworkloads = [[\"A\"]]\n[workloads.A]\nset = 1\n",
        )
        .unwrap();
        let mut test = Test::from_documents(defaults.clone(), defaults, spec).unwrap();

        test.link().unwrap();
        test.link().unwrap();
        assert_eq!(test.phases().len(), 1);
        assert_eq!(test.phase("phases.0").unwrap().tasks().len(), 1);
    }
}
