//! Default prototypes
//!
//! Provides [`DefaultsRegistry`], the system-wide seed for every resolution.
//! The registry is built once from a defaults document and handed around by
//! shared reference; each resolution clones a prototype instead of mutating it.

use crate::error::{HydrateError, SpecError};
use crate::hydrate::{hydrate, Hydrate};
use crate::model::{Phase, Workload, PHASES, WORKLOADS};
use gideon_document::{Document, NodeKind};
use std::path::Path;

/// Prototype `Workload` and `Phase` pre-hydrated with system defaults
///
/// A section missing from the defaults document leaves its prototype unset.
#[derive(Debug, Clone, Default)]
pub struct DefaultsRegistry {
    workload: Option<Workload>,
    phase: Option<Phase>,
}

impl DefaultsRegistry {
    /// Registry with no prototypes
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a defaults document and build the registry from it
    ///
    /// # Errors
    /// - `SpecError::Document` if the file cannot be read or parsed
    /// - `SpecError::Defaults` if a section does not hydrate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let doc = Document::load(path)?;
        Self::from_document(&doc)
    }

    /// Build the registry from an already loaded defaults document
    ///
    /// # Errors
    /// Returns `SpecError::Defaults` if a recognized section is not a table
    /// or one of its values has the wrong kind
    pub fn from_document(doc: &Document) -> Result<Self, SpecError> {
        let mut registry = Self::empty();

        for key in doc.keys() {
            match key {
                WORKLOADS => registry.workload = Some(prototype(doc, WORKLOADS)?),
                PHASES => registry.phase = Some(prototype(doc, PHASES)?),
                other => tracing::debug!("Ignoring defaults section [{}]", other),
            }
        }

        tracing::debug!(
            "Defaults loaded from {}: workload={} phase={}",
            doc.origin(),
            registry.workload.is_some(),
            registry.phase.is_some()
        );
        Ok(registry)
    }

    /// Workload prototype, if the defaults document defined one
    #[inline]
    #[must_use]
    pub fn workload(&self) -> Option<&Workload> {
        self.workload.as_ref()
    }

    /// Phase prototype, if the defaults document defined one
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Option<&Phase> {
        self.phase.as_ref()
    }

    /// Fresh copy of the workload prototype (zero-valued when unset)
    #[must_use]
    pub fn seed_workload(&self) -> Workload {
        self.workload.clone().unwrap_or_default()
    }

    /// Fresh copy of the phase prototype with an empty task set
    #[must_use]
    pub fn seed_phase(&self) -> Phase {
        self.phase.as_ref().map(Phase::unlinked).unwrap_or_default()
    }
}

fn prototype<T: Hydrate + Default>(doc: &Document, section: &'static str) -> Result<T, SpecError> {
    let defaults_error = |source: HydrateError| SpecError::Defaults { section, source };

    let found = doc.get(section).map_or(NodeKind::Table, |node| node.kind());
    let Some(table) = doc.table(section) else {
        return Err(defaults_error(HydrateError::mismatch(section, "table", found)));
    };

    let mut value = T::default();
    hydrate(&mut value, table).map_err(defaults_error)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: &str = r#"
        [workloads]
            set = 0
            get = 0
            ttl = 0
            opRate = 100
            templates = ["templates.default"]

        [phases]
            workloads = [["workloads.", "buckets.*", "conditions."]]
            runtime = 30
    "#;

    #[test]
    fn loads_both_prototypes() {
        let doc = Document::parse(DEFAULTS).unwrap();
        let registry = DefaultsRegistry::from_document(&doc).unwrap();

        assert_eq!(registry.workload().unwrap().op_rate, 100);
        assert_eq!(registry.phase().unwrap().runtime, 30);
    }

    #[test]
    fn missing_sections_leave_prototypes_unset() {
        let doc = Document::parse("[workloads]\nset = 1\n").unwrap();
        let registry = DefaultsRegistry::from_document(&doc).unwrap();

        assert!(registry.workload().is_some());
        assert!(registry.phase().is_none());
        assert_eq!(registry.seed_phase(), Phase::default());
    }

    #[test]
    fn seeds_are_independent_copies() {
        let doc = Document::parse(DEFAULTS).unwrap();
        let registry = DefaultsRegistry::from_document(&doc).unwrap();

        let mut seed = registry.seed_workload();
        seed.set = 42;
        assert_eq!(registry.workload().unwrap().set, 0);
    }

    #[test]
    fn non_table_section_is_rejected() {
        let doc = Document::parse("workloads = 3\n").unwrap();
        let err = DefaultsRegistry::from_document(&doc).unwrap_err();
        assert!(matches!(err, SpecError::Defaults { section: "workloads", .. }));
    }

    #[test]
    fn mismatched_value_is_rejected() {
        let doc = Document::parse("[phases]\nruntime = \"long\"\n").unwrap();
        let err = DefaultsRegistry::from_document(&doc).unwrap_err();
        assert!(matches!(err, SpecError::Defaults { section: "phases", .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("def.toml");
        std::fs::write(&path, DEFAULTS).unwrap();

        let registry = DefaultsRegistry::load(&path).unwrap();
        assert_eq!(registry.workload().unwrap().templates, vec!["templates.default"]);
    }

    #[test]
    fn load_missing_file_is_document_error() {
        let err = DefaultsRegistry::load("/no/such/def.toml").unwrap_err();
        assert!(matches!(err, SpecError::Document(_)));
    }
}
