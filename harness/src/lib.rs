//! Persistent-Memory Test Harness
//!
//! Orchestration core for running compiled test binaries as isolated
//! subprocesses:
//! - Registers test-case descriptors grouped by suite
//! - Classifies tests by size (short/medium/long) for timeout budgets
//! - Runs each test in a fresh scratch directory with bounded output capture
//! - Schedules tests across a bounded worker pool with cancellation support
//! - Aggregates outcomes into a summary and a structured JSON report
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use harness::{HarnessConfig, ResultAggregator, Scheduler, TestRegistry, suites};
//! use tokio::sync::watch;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut registry = TestRegistry::new();
//! suites::register_all(&mut registry)?;
//!
//! let config = Arc::new(HarnessConfig::builder().concurrency(4).build());
//! let aggregator = Arc::new(ResultAggregator::new());
//! let (_cancel_tx, cancel_rx) = watch::channel(false);
//!
//! let scheduler = Scheduler::new(config);
//! scheduler.run_all(&registry, &aggregator, cancel_rx).await?;
//!
//! let summary = aggregator.summary()?;
//! std::process::exit(summary.exit_code());
//! # }
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod runtime;
pub mod suites;

// Main interfaces - re-exported at crate root for convenience
pub use config::{HarnessConfig, HarnessConfigBuilder};
pub use error::{HarnessError, HarnessResult};
pub use runtime::{
    Executor, ReportWriter, ResultAggregator, RunFilter, Scheduler, ScratchDirManager, TestRegistry,
};
