//! Directive types
//!
//! [`Workload`] and [`Phase`] are the two hydratable directive types. A
//! [`Directive`] is whichever one a dotted path resolved to; a [`Task`] is a
//! resolved directive registered inside a phase for execution.

use crate::hydrate::{Field, FieldKind, Hydrate};
use indexmap::IndexMap;
use serde::Serialize;

/// Root table of the test document
pub const TEST: &str = "test";
/// Root of workload directives
pub const WORKLOADS: &str = "workloads";
/// Root of phase directives
pub const PHASES: &str = "phases";
/// Selector root for bucket selectors in workload references
pub const BUCKETS: &str = "buckets";
/// Selector root for condition selectors in workload references
pub const CONDITIONS: &str = "conditions";
/// Selector root for node sets
pub const NODES: &str = "nodes";

/// A named operation mix
///
/// All numeric fields are relative weights or rates; nothing checks that the
/// weights add up to anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    /// Relative weight of set operations
    pub set: i64,
    /// Relative weight of get operations
    pub get: i64,
    /// Relative weight of delete operations
    pub delete: i64,
    /// Relative weight of update operations
    pub update: i64,
    /// Relative weight of expire operations
    pub expire: i64,
    /// Time-to-live for written keys
    pub ttl: i64,
    /// Target operation rate
    pub op_rate: i64,
    /// Key/value template identifiers
    pub templates: Vec<String>,
}

static WORKLOAD_FIELDS: [Field<Workload>; 8] = [
    Field { name: "Set", kind: FieldKind::Integer(|w| &mut w.set) },
    Field { name: "Get", kind: FieldKind::Integer(|w| &mut w.get) },
    Field { name: "Delete", kind: FieldKind::Integer(|w| &mut w.delete) },
    Field { name: "Update", kind: FieldKind::Integer(|w| &mut w.update) },
    Field { name: "Expire", kind: FieldKind::Integer(|w| &mut w.expire) },
    Field { name: "Ttl", kind: FieldKind::Integer(|w| &mut w.ttl) },
    Field { name: "OpRate", kind: FieldKind::Integer(|w| &mut w.op_rate) },
    Field { name: "Templates", kind: FieldKind::Strings(|w| &mut w.templates) },
];

impl Hydrate for Workload {
    fn fields() -> &'static [Field<Self>] {
        &WORKLOAD_FIELDS
    }
}

/// A named execution unit
///
/// `tasks` is filled only by the task linker; hydration never touches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    /// Workload reference rows: `[name, selector...]`
    pub workloads: Vec<Vec<String>>,
    /// Topology additions
    pub add: Vec<String>,
    /// Topology removals
    pub remove: Vec<String>,
    /// Auto-failover directives
    pub auto_failover: Vec<String>,
    /// Seconds the phase should run
    pub runtime: i64,
    #[serde(skip)]
    tasks: IndexMap<String, Task>,
}

static PHASE_FIELDS: [Field<Phase>; 5] = [
    Field { name: "Workloads", kind: FieldKind::StringMatrix(|p| &mut p.workloads) },
    Field { name: "Add", kind: FieldKind::Strings(|p| &mut p.add) },
    Field { name: "Remove", kind: FieldKind::Strings(|p| &mut p.remove) },
    Field { name: "AutoFailover", kind: FieldKind::Strings(|p| &mut p.auto_failover) },
    Field { name: "Runtime", kind: FieldKind::Integer(|p| &mut p.runtime) },
];

impl Hydrate for Phase {
    fn fields() -> &'static [Field<Self>] {
        &PHASE_FIELDS
    }
}

impl Phase {
    /// Workload references, one per non-empty row
    pub fn workload_refs(&self) -> impl Iterator<Item = WorkloadRef<'_>> {
        self.workloads.iter().filter_map(|row| {
            row.split_first()
                .map(|(name, selectors)| WorkloadRef { name, selectors })
        })
    }

    /// Linked tasks keyed by directive path, in link order
    #[inline]
    #[must_use]
    pub fn tasks(&self) -> &IndexMap<String, Task> {
        &self.tasks
    }

    /// Linked task by directive path
    #[inline]
    #[must_use]
    pub fn task(&self, path: &str) -> Option<&Task> {
        self.tasks.get(path)
    }

    /// Replace the task set
    pub(crate) fn install_tasks(&mut self, tasks: IndexMap<String, Task>) {
        self.tasks = tasks;
    }

    /// Copy of this phase with no linked tasks
    #[must_use]
    pub(crate) fn unlinked(&self) -> Self {
        Self {
            workloads: self.workloads.clone(),
            add: self.add.clone(),
            remove: self.remove.clone(),
            auto_failover: self.auto_failover.clone(),
            runtime: self.runtime,
            tasks: IndexMap::new(),
        }
    }
}

/// One row of [`Phase::workloads`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadRef<'a> {
    /// Workload path suffix (`SetOnly` for `workloads.SetOnly`)
    pub name: &'a str,
    /// Remaining row entries, carried uninterpreted
    pub selectors: &'a [String],
}

impl<'a> WorkloadRef<'a> {
    /// Directive path of the referenced workload
    #[must_use]
    pub fn path(&self) -> String {
        format!("{WORKLOADS}.{}", self.name)
    }

    /// First selector rooted at `buckets`
    #[must_use]
    pub fn bucket_selector(&self) -> Option<&'a str> {
        self.selector(BUCKETS)
    }

    /// First selector rooted at `conditions`
    #[must_use]
    pub fn condition_selector(&self) -> Option<&'a str> {
        self.selector(CONDITIONS)
    }

    /// First selector rooted at `nodes`
    #[must_use]
    pub fn node_selector(&self) -> Option<&'a str> {
        self.selector(NODES)
    }

    fn selector(&self, root: &str) -> Option<&'a str> {
        self.selectors
            .iter()
            .map(String::as_str)
            .find(|s| s.split('.').next() == Some(root))
    }
}

/// A runnable entry in a phase's task set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Resolved workload
    Workload(Workload),
    /// Resolved phase
    Phase(Phase),
}

impl Task {
    /// Workload, if this task is one
    #[inline]
    #[must_use]
    pub fn as_workload(&self) -> Option<&Workload> {
        match self {
            Self::Workload(w) => Some(w),
            Self::Phase(_) => None,
        }
    }

    /// Phase, if this task is one
    #[inline]
    #[must_use]
    pub fn as_phase(&self) -> Option<&Phase> {
        match self {
            Self::Phase(p) => Some(p),
            Self::Workload(_) => None,
        }
    }
}

/// First segment of a directive path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveRoot {
    /// `workloads.*`
    Workloads,
    /// `phases.*`
    Phases,
}

impl DirectiveRoot {
    /// Parse a path's first segment
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            WORKLOADS => Some(Self::Workloads),
            PHASES => Some(Self::Phases),
            _ => None,
        }
    }

    /// Section name of this root
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workloads => WORKLOADS,
            Self::Phases => PHASES,
        }
    }
}

/// A resolved directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Directive {
    /// Resolved workload
    Workload(Workload),
    /// Resolved phase
    Phase(Phase),
}

impl Directive {
    /// Directive kind name
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Workload(_) => "workload",
            Self::Phase(_) => "phase",
        }
    }

    /// Workload, if this directive is one
    #[inline]
    #[must_use]
    pub fn as_workload(&self) -> Option<&Workload> {
        match self {
            Self::Workload(w) => Some(w),
            Self::Phase(_) => None,
        }
    }

    /// Phase, if this directive is one
    #[inline]
    #[must_use]
    pub fn as_phase(&self) -> Option<&Phase> {
        match self {
            Self::Phase(p) => Some(p),
            Self::Workload(_) => None,
        }
    }

    /// Convert into a workload, returning `self` unchanged otherwise
    ///
    /// # Errors
    /// Returns the directive itself if it is not a workload
    pub fn into_workload(self) -> Result<Workload, Self> {
        match self {
            Self::Workload(w) => Ok(w),
            other => Err(other),
        }
    }

    /// Convert into a phase, returning `self` unchanged otherwise
    ///
    /// # Errors
    /// Returns the directive itself if it is not a phase
    pub fn into_phase(self) -> Result<Phase, Self> {
        match self {
            Self::Phase(p) => Ok(p),
            other => Err(other),
        }
    }
}

impl From<Directive> for Task {
    fn from(directive: Directive) -> Self {
        match directive {
            Directive::Workload(w) => Self::Workload(w),
            Directive::Phase(p) => Self::Phase(p),
        }
    }
}
