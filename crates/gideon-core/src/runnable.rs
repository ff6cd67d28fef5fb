//! Runnable capability
//!
//! Every task exposes a single capability: run, possibly failing. What a
//! workload actually does against a store is behind [`WorkloadExecutor`];
//! this crate only decides which tasks run and in what order.

use crate::error::ExecutionError;
use crate::model::{Phase, Task, Workload};

/// Drives a resolved workload
///
/// Implement this trait to plug in a real store driver.
pub trait WorkloadExecutor: Send + Sync {
    /// Execute one workload registered under `path`
    ///
    /// # Errors
    /// Returns `ExecutionError` if the workload fails
    fn execute(&self, path: &str, workload: &Workload) -> Result<(), ExecutionError>;
}

/// Something that can be run under a directive path
pub trait Runnable {
    /// Run under `path`, delegating workload execution to `executor`
    ///
    /// # Errors
    /// Returns the first `ExecutionError` raised
    fn run(&self, path: &str, executor: &dyn WorkloadExecutor) -> Result<(), ExecutionError>;
}

impl Runnable for Workload {
    fn run(&self, path: &str, executor: &dyn WorkloadExecutor) -> Result<(), ExecutionError> {
        executor.execute(path, self)
    }
}

impl Runnable for Phase {
    /// Runs every linked task in link order, stopping at the first failure
    fn run(&self, path: &str, executor: &dyn WorkloadExecutor) -> Result<(), ExecutionError> {
        tracing::info!(
            "Running phase {} ({} tasks, runtime {}s)",
            path,
            self.tasks().len(),
            self.runtime
        );
        for (task_path, task) in self.tasks() {
            task.run(task_path, executor)?;
        }
        Ok(())
    }
}

impl Runnable for Task {
    fn run(&self, path: &str, executor: &dyn WorkloadExecutor) -> Result<(), ExecutionError> {
        match self {
            Self::Workload(w) => w.run(path, executor),
            Self::Phase(p) => p.run(path, executor),
        }
    }
}

/// Executor that only logs each workload's operation mix
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingExecutor;

impl WorkloadExecutor for LoggingExecutor {
    fn execute(&self, path: &str, workload: &Workload) -> Result<(), ExecutionError> {
        tracing::info!(
            "Workload {}: set={} get={} delete={} update={} expire={} ttl={} opRate={} templates={:?}",
            path,
            workload.set,
            workload.get,
            workload.delete,
            workload.update,
            workload.expire,
            workload.ttl,
            workload.op_rate,
            workload.templates
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    impl WorkloadExecutor for Counting {
        fn execute(&self, path: &str, _workload: &Workload) -> Result<(), ExecutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(path) {
                return Err(ExecutionError::failed(path, "boom"));
            }
            Ok(())
        }
    }

    fn phase_with(paths: &[&str]) -> Phase {
        let mut phase = Phase::default();
        let tasks: IndexMap<_, _> = paths
            .iter()
            .map(|p| ((*p).to_string(), Task::Workload(Workload::default())))
            .collect();
        phase.install_tasks(tasks);
        phase
    }

    #[test]
    fn phase_runs_every_task() {
        let executor = Counting::default();
        phase_with(&["workloads.a", "workloads.b"]).run("phases.0", &executor).unwrap();
        assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn phase_stops_at_first_failure() {
        let executor = Counting {
            fail_on: Some("workloads.a"),
            ..Counting::default()
        };
        let err = phase_with(&["workloads.a", "workloads.b"])
            .run("phases.0", &executor)
            .unwrap_err();

        assert!(err.to_string().contains("workloads.a"));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nested_phase_task_runs_through() {
        let executor = Counting::default();
        let inner = phase_with(&["workloads.x"]);
        let outer = {
            let mut phase = Phase::default();
            let mut tasks = IndexMap::new();
            tasks.insert("phases.inner".to_string(), Task::Phase(inner));
            phase.install_tasks(tasks);
            phase
        };

        outer.run("phases.outer", &executor).unwrap();
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn logging_executor_succeeds() {
        assert!(LoggingExecutor.execute("workloads.a", &Workload::default()).is_ok());
    }
}
