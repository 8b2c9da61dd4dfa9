//! Harness Configuration
//!
//! Policy knobs for scheduling, timeouts, scratch directories and output
//! capture. All values are configuration-driven; the size-class timeouts
//! default to the values in [`SizeClass::default_timeout`].

use shared::SizeClass;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the scratch root directory
pub const SCRATCH_ROOT_ENV: &str = "PMTEST_SCRATCH_ROOT";
/// Environment variable overriding the test binary directory
pub const BIN_DIR_ENV: &str = "PMTEST_BIN_DIR";

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Root directory under which per-test scratch directories are created
    pub scratch_root: PathBuf,
    /// Directory against which relative test binary names are resolved
    pub bin_dir: PathBuf,
    /// Wall-clock budget for short tests
    pub short_timeout: Duration,
    /// Wall-clock budget for medium tests
    pub medium_timeout: Duration,
    /// Wall-clock budget for long tests
    pub long_timeout: Duration,
    /// Global timeout override applied to every size class when set
    pub timeout_override: Option<Duration>,
    /// Worker pool size (defaults to available parallelism)
    pub concurrency: usize,
    /// Keep scratch directories of failing tests for diagnostics
    pub keep_on_failure: bool,
    /// Cap on captured bytes per stream before truncation
    pub max_capture_bytes: usize,
    /// Grace period between SIGTERM and SIGKILL when terminating a test
    pub kill_grace: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let scratch_root = std::env::var(SCRATCH_ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./pmtest-scratch"));
        let bin_dir = std::env::var(BIN_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Self {
            scratch_root,
            bin_dir,
            short_timeout: SizeClass::Short.default_timeout(),
            medium_timeout: SizeClass::Medium.default_timeout(),
            long_timeout: SizeClass::Long.default_timeout(),
            timeout_override: None,
            concurrency: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            keep_on_failure: false,
            max_capture_bytes: 1024 * 1024, // 1 MiB per stream
            kill_grace: Duration::from_secs(5),
        }
    }
}

impl HarnessConfig {
    /// Create a new builder
    pub fn builder() -> crate::config::builder::HarnessConfigBuilder {
        crate::config::builder::HarnessConfigBuilder::new()
    }

    /// Effective timeout for a size class, honoring the global override
    pub fn timeout_for(&self, size_class: SizeClass) -> Duration {
        if let Some(override_timeout) = self.timeout_override {
            return override_timeout;
        }
        match size_class {
            SizeClass::Short => self.short_timeout,
            SizeClass::Medium => self.medium_timeout,
            SizeClass::Long => self.long_timeout,
        }
    }
}
