//! Runtime components of the harness
//!
//! Registry of declared tests, scratch directory lifecycle, subprocess
//! execution, worker-pool scheduling, result aggregation and report output.

pub mod aggregator;
pub mod executor;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod scratch;

pub use aggregator::ResultAggregator;
pub use executor::Executor;
pub use registry::{RunFilter, TestRegistry};
pub use report::ReportWriter;
pub use scheduler::Scheduler;
pub use scratch::ScratchDirManager;
