//! Result Aggregator
//!
//! Accumulates per-test outcomes under mutual exclusion; safe to call from
//! concurrently completing workers. A poisoned lock means a worker panicked
//! mid-record, which is the one fault class allowed to abort the whole run.

use shared::{RunSummary, TestOutcome};
use std::sync::Mutex;

use crate::error::{HarnessError, HarnessResult};

#[derive(Debug, Default)]
struct AggregatorState {
    outcomes: Vec<TestOutcome>,
    summary: RunSummary,
}

/// Thread-safe accumulator for test outcomes
#[derive(Debug, Default)]
pub struct ResultAggregator {
    state: Mutex<AggregatorState>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed test outcome
    pub fn record(&self, outcome: TestOutcome) -> HarnessResult<()> {
        let mut state = self.lock()?;
        state.summary.record(outcome.status);
        state.outcomes.push(outcome);
        Ok(())
    }

    /// Current counters
    pub fn summary(&self) -> HarnessResult<RunSummary> {
        Ok(self.lock()?.summary)
    }

    /// Snapshot of outcomes in completion order
    pub fn outcomes(&self) -> HarnessResult<Vec<TestOutcome>> {
        Ok(self.lock()?.outcomes.clone())
    }

    fn lock(&self) -> HarnessResult<std::sync::MutexGuard<'_, AggregatorState>> {
        self.state.lock().map_err(|e| HarnessError::Aggregator {
            message: format!("aggregator state corrupted: {e}"),
        })
    }
}
