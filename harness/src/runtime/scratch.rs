//! Scratch Directory Manager
//!
//! Allocates an isolated working directory per test invocation and tears it
//! down after outcome capture. Directory names are nonce-qualified so
//! concurrent or repeated runs of the same test never collide; no locking is
//! needed beyond the filesystem's atomic directory creation.

use shared::OutcomeStatus;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{HarnessError, HarnessResult};

/// Allocates and releases per-test scratch directories under a common root
#[derive(Debug, Clone)]
pub struct ScratchDirManager {
    root: PathBuf,
    keep_on_failure: bool,
}

impl ScratchDirManager {
    pub fn new<P: Into<PathBuf>>(root: P, keep_on_failure: bool) -> Self {
        Self {
            root: root.into(),
            keep_on_failure,
        }
    }

    /// Create a fresh scratch directory for one run of `test_id`, returning
    /// its absolute path. Creation failure (disk full, permissions) surfaces
    /// as an error the caller converts to a setup-error outcome.
    pub fn acquire(&self, test_id: &str) -> HarnessResult<PathBuf> {
        let nonce = Uuid::new_v4().simple().to_string();
        let dir_name = format!("{}-{}", sanitize_id(test_id), &nonce[..12]);
        let path = self.root.join(dir_name);

        std::fs::create_dir_all(&path).map_err(|e| HarnessError::Setup {
            message: format!("failed to create scratch dir {}: {e}", path.display()),
        })?;

        // Tests receive and resolve paths relative to their own cwd, so the
        // scratch path handed out must be absolute.
        let absolute = path.canonicalize().map_err(|e| HarnessError::Setup {
            message: format!("failed to canonicalize scratch dir {}: {e}", path.display()),
        })?;

        debug!("🗂️ Acquired scratch dir {} for {}", absolute.display(), test_id);
        Ok(absolute)
    }

    /// Remove the scratch directory unless the outcome failed and retention
    /// is enabled. Returns `true` when the directory was retained.
    pub fn release(&self, scratch_dir: &Path, status: OutcomeStatus) -> HarnessResult<bool> {
        if self.keep_on_failure && status.is_failure() {
            warn!(
                "🗂️ Retaining scratch dir {} for diagnostics ({})",
                scratch_dir.display(),
                status
            );
            return Ok(true);
        }

        match std::fs::remove_dir_all(scratch_dir) {
            Ok(()) => {
                debug!("🧹 Removed scratch dir {}", scratch_dir.display());
                Ok(false)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(HarnessError::Setup {
                message: format!("failed to remove scratch dir {}: {e}", scratch_dir.display()),
            }),
        }
    }
}

/// Make a suite-qualified test id usable as a single path component
fn sanitize_id(test_id: &str) -> String {
    test_id.replace(['/', '\\'], "_")
}
