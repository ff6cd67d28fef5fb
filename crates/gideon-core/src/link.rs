//! Task graph linking
//!
//! Walks the test document's phase list and each phase's workload rows,
//! resolving every reference into an independent directive copy. Unlike
//! resolution, linking fails fast on the first error.

use crate::directive::DirectiveResolver;
use crate::error::LinkError;
use crate::model::{Phase, Task, PHASES, TEST};
use indexmap::IndexMap;

/// Links resolved directives into phase task sets
#[derive(Debug, Clone, Copy)]
pub struct TaskGraphLinker<'a> {
    resolver: DirectiveResolver<'a>,
}

impl<'a> TaskGraphLinker<'a> {
    /// Create linker over a resolver
    #[inline]
    #[must_use]
    pub fn new(resolver: DirectiveResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Resolve every workload row of `phase` into its task set
    ///
    /// Each row's first element names the workload (`workloads.<name>`); the
    /// resolved workload is registered under that path. On error the phase's
    /// task set is left as it was.
    ///
    /// # Errors
    /// Returns `LinkError::Resolve` for the first row that fails to resolve
    pub fn link_phase_tasks(&self, phase: &mut Phase) -> Result<(), LinkError> {
        let mut tasks = IndexMap::new();

        for reference in phase.workload_refs() {
            let path = reference.path();
            let workload = self.resolver.resolve_workload(&path)?;
            tracing::debug!("Linked task {} ({} selectors)", path, reference.selectors.len());
            tasks.insert(path, Task::Workload(workload));
        }

        phase.install_tasks(tasks);
        Ok(())
    }

    /// Ordered phase names from `test.phases`
    ///
    /// # Errors
    /// - `LinkError::MissingTestRoot` if the test document has no `[test]` table
    /// - `LinkError::InvalidPhaseList` if `test.phases` is absent or not a list of strings
    pub fn phase_names(&self) -> Result<Vec<String>, LinkError> {
        let test = self
            .resolver
            .spec()
            .table(TEST)
            .ok_or(LinkError::MissingTestRoot)?;

        let phases = test
            .get(PHASES)
            .ok_or_else(|| LinkError::InvalidPhaseList(format!("[{TEST}] has no '{PHASES}' key")))?;
        let list = phases.as_list().ok_or_else(|| {
            LinkError::InvalidPhaseList(format!("expected list of strings, found {}", phases.kind()))
        })?;

        list.iter()
            .enumerate()
            .map(|(i, node)| {
                node.as_str().map(str::to_string).ok_or_else(|| {
                    LinkError::InvalidPhaseList(format!("entry {i} is a {}, expected string", node.kind()))
                })
            })
            .collect()
    }

    /// Resolve and link every phase named in `test.phases`
    ///
    /// Phases are registered into `phases` under the name as written, in list
    /// order. Linking stops at the first failure; phases registered before it
    /// stay registered.
    ///
    /// # Errors
    /// - Any error from [`phase_names`](Self::phase_names)
    /// - `LinkError::Resolve` if a phase or one of its workloads fails to resolve
    pub fn link_test_phases(&self, phases: &mut IndexMap<String, Phase>) -> Result<(), LinkError> {
        for name in self.phase_names()? {
            let mut phase = self.resolver.resolve_phase(&name)?;
            self.link_phase_tasks(&mut phase)?;
            tracing::debug!("Registered phase {} with {} tasks", name, phase.tasks().len());
            phases.insert(name, phase);
        }
        Ok(())
    }
}
