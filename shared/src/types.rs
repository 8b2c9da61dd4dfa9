//! Core shared types for test descriptors and outcomes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::SharedError;

/// Placeholder token in descriptor arguments, replaced with the absolute
/// scratch directory path at execution time.
pub const SCRATCH_DIR_TOKEN: &str = "{scratchDir}";

/// Coarse cost category of a test, governs default timeout and scheduling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Short,
    Medium,
    Long,
}

impl SizeClass {
    /// Default wall-clock budget for this class (overridable via config)
    pub fn default_timeout(&self) -> Duration {
        match self {
            SizeClass::Short => Duration::from_secs(60),
            SizeClass::Medium => Duration::from_secs(300),
            SizeClass::Long => Duration::from_secs(1800),
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeClass::Short => write!(f, "short"),
            SizeClass::Medium => write!(f, "medium"),
            SizeClass::Long => write!(f, "long"),
        }
    }
}

impl FromStr for SizeClass {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(SizeClass::Short),
            "medium" => Ok(SizeClass::Medium),
            "long" => Ok(SizeClass::Long),
            _ => Err(SharedError::InvalidSizeClass { input: s.to_string() }),
        }
    }
}

/// Expected exit behavior of a test subprocess
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedExit {
    /// Exact exit code expected (default: 0)
    Code(i32),
    /// Any exit accepted - for tests that deliberately probe failure paths
    Any,
}

impl Default for ExpectedExit {
    fn default() -> Self {
        ExpectedExit::Code(0)
    }
}

impl ExpectedExit {
    /// Check an observed exit code against the expectation.
    ///
    /// `None` means the process was killed by a signal, which only `Any`
    /// accepts.
    pub fn matches(&self, exit_code: Option<i32>) -> bool {
        match self {
            ExpectedExit::Any => true,
            ExpectedExit::Code(expected) => exit_code == Some(*expected),
        }
    }
}

/// Immutable declaration of one test case, independent of its execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseDescriptor {
    /// Stable identifier, suite-qualified (e.g. `obj_many_pools/TEST0`)
    pub id: String,
    /// Size class governing default timeout and scheduling priority
    pub size_class: SizeClass,
    /// Executable name plus arguments; arguments may carry [`SCRATCH_DIR_TOKEN`]
    pub command: Vec<String>,
    /// Expected exit behavior of the subprocess
    pub expected_exit: ExpectedExit,
}

impl TestCaseDescriptor {
    /// Create a descriptor invoking `program` with no arguments yet
    pub fn new<I: Into<String>, P: Into<String>>(id: I, size_class: SizeClass, program: P) -> Self {
        Self {
            id: id.into(),
            size_class,
            command: vec![program.into()],
            expected_exit: ExpectedExit::default(),
        }
    }

    /// Append one argument (fluent API)
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.command.push(arg.into());
        self
    }

    /// Append several arguments (fluent API)
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command.extend(args.into_iter().map(Into::into));
        self
    }

    /// Override the expected exit behavior (fluent API)
    pub fn expected_exit(mut self, expected: ExpectedExit) -> Self {
        self.expected_exit = expected;
        self
    }

    /// Suite portion of the id (everything before the first `/`)
    pub fn suite(&self) -> &str {
        self.id.split('/').next().unwrap_or(&self.id)
    }
}

/// Final classification of one test execution
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Subprocess exited matching the expected exit and within budget
    Passed,
    /// Subprocess ran but its exit did not match the expectation
    Failed,
    /// Test deliberately not run (cancellation or filtering)
    Skipped,
    /// Subprocess exceeded its wall-clock budget and was terminated
    TimedOut,
    /// Environment failure before the subprocess meaningfully ran
    SetupError,
}

impl OutcomeStatus {
    /// Whether this status counts against the run's exit code
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            OutcomeStatus::Failed | OutcomeStatus::TimedOut | OutcomeStatus::SetupError
        )
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Passed => write!(f, "passed"),
            OutcomeStatus::Failed => write!(f, "failed"),
            OutcomeStatus::Skipped => write!(f, "skipped"),
            OutcomeStatus::TimedOut => write!(f, "timed-out"),
            OutcomeStatus::SetupError => write!(f, "setup-error"),
        }
    }
}

/// Recorded result of executing one descriptor once
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestOutcome {
    pub descriptor_id: String,
    pub status: OutcomeStatus,
    /// Exit code of the subprocess, `None` if killed by a signal or never run
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    pub stdout: String,
    pub stderr: String,
    /// Scratch directory retained for diagnostics, if retention applied
    pub scratch_dir: Option<PathBuf>,
}

impl TestOutcome {
    /// Outcome for a test that was never started
    pub fn skipped<I: Into<String>>(descriptor_id: I) -> Self {
        Self {
            descriptor_id: descriptor_id.into(),
            status: OutcomeStatus::Skipped,
            exit_code: None,
            duration_ms: 0,
            stdout: String::new(),
            stderr: String::new(),
            scratch_dir: None,
        }
    }

    /// Outcome for an environment failure before the subprocess ran
    pub fn setup_error<I: Into<String>, M: Into<String>>(descriptor_id: I, message: M) -> Self {
        Self {
            descriptor_id: descriptor_id.into(),
            status: OutcomeStatus::SetupError,
            exit_code: None,
            duration_ms: 0,
            stdout: String::new(),
            stderr: message.into(),
            scratch_dir: None,
        }
    }
}

/// Aggregated counters for a whole run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub timed_out: usize,
    pub setup_errors: usize,
}

impl RunSummary {
    /// Fold one outcome status into the counters
    pub fn record(&mut self, status: OutcomeStatus) {
        self.total += 1;
        match status {
            OutcomeStatus::Passed => self.passed += 1,
            OutcomeStatus::Failed => self.failed += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
            OutcomeStatus::TimedOut => self.timed_out += 1,
            OutcomeStatus::SetupError => self.setup_errors += 1,
        }
    }

    /// Whether every executed test passed (skips do not count against success)
    pub fn success(&self) -> bool {
        self.failed == 0 && self.timed_out == 0 && self.setup_errors == 0
    }

    /// Process exit code for the run: 0 on success, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.success() { 0 } else { 1 }
    }
}
