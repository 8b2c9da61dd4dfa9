//! Common test utilities for harness integration tests
//!
//! Provides stub test binaries (shell scripts) and pre-wired configurations
//! so each test reads as arrange/act/assert.

use harness::HarnessConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Write an executable shell script named `name` into `dir`, standing in
/// for a compiled test binary.
pub fn write_stub_binary(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Harness configuration pointing at the given scratch root and binary
/// directory, with a short kill grace so terminations stay fast.
pub fn test_config(scratch_root: &Path, bin_dir: &Path, concurrency: usize) -> Arc<HarnessConfig> {
    Arc::new(
        HarnessConfig::builder()
            .scratch_root(scratch_root)
            .bin_dir(bin_dir)
            .concurrency(concurrency)
            .kill_grace(Duration::from_millis(200))
            .build(),
    )
}
