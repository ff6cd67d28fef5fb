//! Gideon Core - test specification resolution
//!
//! Turns a set of layered TOML documents into a runnable task graph:
//! - Hydrates typed `Workload` and `Phase` directives from document tables
//! - Seeds every resolution from a registry of system defaults
//! - Resolves dotted paths by layering defaults, base and test overrides
//! - Links the test's phase list into per-phase task sets
//! - Runs linked tasks through a pluggable executor
//!
//! # Example
//!
//! ```rust
//! use gideon_core::Test;
//! use gideon_document::Document;
//!
//! let defaults = Document::parse("[workloads]\nset = 0\nopRate = 100\n")?;
//! let spec = Document::parse(
//!     r#"
//!     [test]
//!     phases = ["phases.0"]
//!
//!     [phases.0]
//!     workloads = [["SetOnly"]]
//!
//!     [workloads.SetOnly]
//!     set = 9
//!     "#,
//! )?;
//!
//! let mut test = Test::from_documents(defaults.clone(), defaults, spec)?;
//! test.link()?;
//!
//! let workload = test.phase("phases.0").unwrap().task("workloads.SetOnly").unwrap();
//! assert_eq!(workload.as_workload().unwrap().set, 9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod defaults;
pub mod directive;
pub mod error;
pub mod hydrate;
pub mod link;
pub mod model;
pub mod runnable;
pub mod runner;

pub use defaults::DefaultsRegistry;
pub use directive::{DirectivePath, DirectiveResolver};
pub use error::{ExecutionError, HydrateError, LinkError, ResolveError, SpecError, SpecResult};
pub use hydrate::{hydrate, Field, FieldKind, Hydrate, Hydration};
pub use link::TaskGraphLinker;
pub use model::{Directive, DirectiveRoot, Phase, Task, Workload, WorkloadRef};
pub use runnable::{LoggingExecutor, Runnable, WorkloadExecutor};
pub use runner::{RunSummary, Test, TestConfig};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Gideon Core
    pub use crate::{
        DefaultsRegistry, Directive, DirectiveResolver, Phase, Runnable, SpecError, Task, Test,
        TestConfig, Workload, WorkloadExecutor,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
