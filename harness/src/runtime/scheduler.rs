//! Scheduler
//!
//! Dispatches registered descriptors to a bounded worker pool. Outcomes are
//! reported in the order tests *complete*, which is non-deterministic across
//! concurrent runs; with concurrency 1 the scheduler runs strictly
//! sequentially and preserves registration order. At most one long test is
//! in flight at a time regardless of overall concurrency, bounding peak
//! resource usage.

use shared::{SizeClass, TestCaseDescriptor, TestOutcome};
use std::sync::Arc;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::runtime::{Executor, ResultAggregator, ScratchDirManager, TestRegistry};

/// Worker-pool dispatcher for registered tests
pub struct Scheduler {
    config: Arc<HarnessConfig>,
    executor: Arc<Executor>,
    scratch: Arc<ScratchDirManager>,
}

impl Scheduler {
    pub fn new(config: Arc<HarnessConfig>) -> Self {
        let executor = Arc::new(Executor::new(Arc::clone(&config)));
        let scratch = Arc::new(ScratchDirManager::new(
            config.scratch_root.clone(),
            config.keep_on_failure,
        ));
        Self {
            config,
            executor,
            scratch,
        }
    }

    /// Run every descriptor in the registry, recording each outcome into the
    /// aggregator as it completes. Cancellation terminates in-flight
    /// subprocesses and marks not-yet-started tests as skipped.
    pub async fn run_all(
        &self,
        registry: &TestRegistry,
        aggregator: &Arc<ResultAggregator>,
        cancel: watch::Receiver<bool>,
    ) -> HarnessResult<Vec<TestOutcome>> {
        info!(
            "🧪 Running {} tests (concurrency {})",
            registry.len(),
            self.config.concurrency
        );

        if self.config.concurrency <= 1 {
            self.run_sequential(registry, aggregator, cancel).await
        } else {
            self.run_concurrent(registry, aggregator, cancel).await
        }
    }

    /// Deterministic mode: registration order, one test at a time
    async fn run_sequential(
        &self,
        registry: &TestRegistry,
        aggregator: &Arc<ResultAggregator>,
        cancel: watch::Receiver<bool>,
    ) -> HarnessResult<Vec<TestOutcome>> {
        let mut results = Vec::with_capacity(registry.len());

        for descriptor in registry.all() {
            let outcome = if *cancel.borrow() {
                TestOutcome::skipped(&descriptor.id)
            } else {
                run_one(&self.executor, &self.scratch, descriptor, cancel.clone()).await
            };
            log_outcome(&outcome);
            aggregator.record(outcome.clone())?;
            results.push(outcome);
        }

        Ok(results)
    }

    /// Worker-pool mode: completion order, bounded by the concurrency limit
    /// plus a dedicated single-slot gate for long tests
    async fn run_concurrent(
        &self,
        registry: &TestRegistry,
        aggregator: &Arc<ResultAggregator>,
        cancel: watch::Receiver<bool>,
    ) -> HarnessResult<Vec<TestOutcome>> {
        let workers = Arc::new(Semaphore::new(self.config.concurrency));
        let long_gate = Arc::new(Semaphore::new(1));
        let mut tasks = JoinSet::new();

        for descriptor in registry.all() {
            let descriptor = descriptor.clone();
            let executor = Arc::clone(&self.executor);
            let scratch = Arc::clone(&self.scratch);
            let workers = Arc::clone(&workers);
            let long_gate = Arc::clone(&long_gate);
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let Ok(_permit) = workers.acquire_owned().await else {
                    return TestOutcome::skipped(&descriptor.id);
                };
                let _long_permit = if descriptor.size_class == SizeClass::Long {
                    match long_gate.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(_) => return TestOutcome::skipped(&descriptor.id),
                    }
                } else {
                    None
                };
                if *cancel.borrow() {
                    return TestOutcome::skipped(&descriptor.id);
                }
                run_one(&executor, &scratch, &descriptor, cancel).await
            });
        }

        let mut results = Vec::with_capacity(registry.len());
        while let Some(joined) = tasks.join_next().await {
            // A panicked worker is a fault in the harness itself, not a test
            // failure; abort the run.
            let outcome = joined.map_err(|e| HarnessError::Scheduler {
                message: format!("worker task failed: {e}"),
            })?;
            log_outcome(&outcome);
            aggregator.record(outcome.clone())?;
            results.push(outcome);
        }

        Ok(results)
    }
}

/// Acquire a scratch directory, execute, then release it. Scratch failures
/// become setup-error outcomes; release failures are logged but never fail
/// the test that already produced a result.
async fn run_one(
    executor: &Executor,
    scratch: &ScratchDirManager,
    descriptor: &TestCaseDescriptor,
    cancel: watch::Receiver<bool>,
) -> TestOutcome {
    let scratch_dir = match scratch.acquire(&descriptor.id) {
        Ok(dir) => dir,
        Err(e) => return TestOutcome::setup_error(&descriptor.id, e.to_string()),
    };

    let mut outcome = executor.run(descriptor, &scratch_dir, cancel).await;

    match scratch.release(&scratch_dir, outcome.status) {
        Ok(true) => outcome.scratch_dir = Some(scratch_dir),
        Ok(false) => {}
        Err(e) => warn!("⚠️ Failed to release scratch dir for {}: {e}", descriptor.id),
    }

    outcome
}

fn log_outcome(outcome: &TestOutcome) {
    match outcome.status {
        shared::OutcomeStatus::Passed => {
            info!("✅ {} passed in {}ms", outcome.descriptor_id, outcome.duration_ms);
        }
        shared::OutcomeStatus::Failed => {
            error!(
                "❌ {} failed (exit {:?}) in {}ms",
                outcome.descriptor_id, outcome.exit_code, outcome.duration_ms
            );
        }
        shared::OutcomeStatus::TimedOut => {
            error!("⏰ {} timed out after {}ms", outcome.descriptor_id, outcome.duration_ms);
        }
        shared::OutcomeStatus::SetupError => {
            error!("🚫 {} setup error: {}", outcome.descriptor_id, outcome.stderr.trim());
        }
        shared::OutcomeStatus::Skipped => {
            info!("⏭️ {} skipped", outcome.descriptor_id);
        }
    }
}
