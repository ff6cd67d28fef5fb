//! Testing utilities for Gideon workspace
//!
//! Shared base documents, test builders and recording executors.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use gideon_core::{ExecutionError, Test, Workload, WorkloadExecutor};
use gideon_document::Document;
use parking_lot::Mutex;

/// System defaults used by most tests
pub const BASE_DEFAULTS: &str = r#"
[workloads]
    set = 0
    get = 0
    delete = 0
    update = 0
    expire = 0
    ttl = 0
    opRate = 100
    templates = ["templates.default"]

[phases]
    workloads = [["workloads.", "buckets.*", "conditions."]]
    runtime = 30
"#;

/// The minimal one-phase, one-workload test document
pub const SET_ONLY_SPEC: &str = r#"
[test]
    phases = ["phases.0"]

[phases.0]
    workloads = [["SetOnly"]]

[workloads.SetOnly]
    set = 9
"#;

pub fn document(text: &str) -> Document {
    Document::parse(text).unwrap()
}

/// Test over `BASE_DEFAULTS`, which doubles as the base document
pub fn test_from_spec(spec: &str) -> Test {
    test_from_parts(BASE_DEFAULTS, BASE_DEFAULTS, spec)
}

pub fn test_from_parts(defaults: &str, base: &str, spec: &str) -> Test {
    Test::from_documents(document(defaults), document(base), document(spec)).unwrap()
}

/// Records every executed workload in call order
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(String, Workload)>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(path, _)| path.clone()).collect()
    }

    pub fn calls(&self) -> Vec<(String, Workload)> {
        self.calls.lock().clone()
    }
}

impl WorkloadExecutor for RecordingExecutor {
    fn execute(&self, path: &str, workload: &Workload) -> Result<(), ExecutionError> {
        self.calls.lock().push((path.to_string(), workload.clone()));
        Ok(())
    }
}

/// Fails on one workload path, records the rest
#[derive(Debug)]
pub struct FailingExecutor {
    fail_on: String,
    inner: RecordingExecutor,
}

impl FailingExecutor {
    pub fn on(path: &str) -> Self {
        Self {
            fail_on: path.to_string(),
            inner: RecordingExecutor::new(),
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.inner.paths()
    }
}

impl WorkloadExecutor for FailingExecutor {
    fn execute(&self, path: &str, workload: &Workload) -> Result<(), ExecutionError> {
        if path == self.fail_on {
            return Err(ExecutionError::failed(path, "injected failure"));
        }
        self.inner.execute(path, workload)
    }
}
