//! Harness Configuration Builder
//!
//! Provides a fluent builder for constructing harness configurations

use super::HarnessConfig;
use std::path::PathBuf;
use std::time::Duration;

pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: HarnessConfig::default(),
        }
    }

    /// Set the scratch root directory
    pub fn scratch_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.config.scratch_root = root.into();
        self
    }

    /// Set the test binary directory
    pub fn bin_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.bin_dir = dir.into();
        self
    }

    /// Set the short-test timeout
    pub fn short_timeout(mut self, timeout: Duration) -> Self {
        self.config.short_timeout = timeout;
        self
    }

    /// Set the medium-test timeout
    pub fn medium_timeout(mut self, timeout: Duration) -> Self {
        self.config.medium_timeout = timeout;
        self
    }

    /// Set the long-test timeout
    pub fn long_timeout(mut self, timeout: Duration) -> Self {
        self.config.long_timeout = timeout;
        self
    }

    /// Set a global timeout override applied to every size class
    pub fn timeout_override(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout_override = timeout;
        self
    }

    /// Set the worker pool size
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency.max(1);
        self
    }

    /// Keep scratch directories of failing tests for diagnostics
    pub fn keep_on_failure(mut self, keep: bool) -> Self {
        self.config.keep_on_failure = keep;
        self
    }

    /// Set the per-stream output capture cap in bytes
    pub fn max_capture_bytes(mut self, cap: usize) -> Self {
        self.config.max_capture_bytes = cap;
        self
    }

    /// Set the SIGTERM-to-SIGKILL grace period
    pub fn kill_grace(mut self, grace: Duration) -> Self {
        self.config.kill_grace = grace;
        self
    }

    /// Build the configuration
    pub fn build(self) -> HarnessConfig {
        self.config
    }
}

impl Default for HarnessConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
