//! Executor
//!
//! Runs one test descriptor as a subprocess: resolves the test binary,
//! substitutes the scratch-directory placeholder, captures bounded
//! stdout/stderr, enforces the size-class timeout and guarantees the child
//! (and its process group) is reaped on every exit path.

use shared::{OutcomeStatus, SCRATCH_DIR_TOKEN, TestCaseDescriptor, TestOutcome};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::HarnessConfig;

/// Marker appended when a stream exceeded the capture cap
const TRUNCATION_MARKER: &str = "\n... [output truncated]";

/// How one subprocess wait ended
enum WaitEnd {
    Exited(std::io::Result<std::process::ExitStatus>),
    TimedOut,
    Cancelled,
}

/// Runs descriptors as isolated subprocesses
pub struct Executor {
    config: Arc<HarnessConfig>,
}

impl Executor {
    pub fn new(config: Arc<HarnessConfig>) -> Self {
        Self { config }
    }

    /// Execute one descriptor inside `scratch_dir`.
    ///
    /// Never returns an error: every failure mode is folded into the
    /// outcome's status so the scheduler sees a uniform result stream.
    pub async fn run(
        &self,
        descriptor: &TestCaseDescriptor,
        scratch_dir: &Path,
        cancel: watch::Receiver<bool>,
    ) -> TestOutcome {
        let Some(program) = descriptor.command.first() else {
            return TestOutcome::setup_error(&descriptor.id, "descriptor has an empty command");
        };
        let binary = match self.resolve_binary(program) {
            Ok(binary) => binary,
            Err(message) => return TestOutcome::setup_error(&descriptor.id, message),
        };

        let scratch_str = scratch_dir.to_string_lossy();
        let args: Vec<String> = descriptor.command[1..]
            .iter()
            .map(|arg| arg.replace(SCRATCH_DIR_TOKEN, &scratch_str))
            .collect();

        let mut cmd = Command::new(&binary);
        cmd.args(&args)
            .current_dir(scratch_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group so timeout termination reaches the whole tree
        #[cfg(unix)]
        cmd.process_group(0);

        let started = Instant::now();
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return TestOutcome::setup_error(
                    &descriptor.id,
                    format!("failed to launch {}: {e}", binary.display()),
                );
            }
        };

        debug!(
            "🧪 Launched {} (pid {:?}) in {}",
            descriptor.id,
            child.id(),
            scratch_dir.display()
        );

        // Drain both streams concurrently so a chatty child never blocks on
        // a full pipe; buffers are capped, draining is not.
        let cap = self.config.max_capture_bytes;
        let stdout_task = child.stdout.take().map(|s| tokio::spawn(read_capped(s, cap)));
        let stderr_task = child.stderr.take().map(|s| tokio::spawn(read_capped(s, cap)));

        let budget = self.config.timeout_for(descriptor.size_class);
        let end = tokio::select! {
            res = child.wait() => WaitEnd::Exited(res),
            _ = tokio::time::sleep(budget) => WaitEnd::TimedOut,
            _ = wait_cancelled(cancel) => WaitEnd::Cancelled,
        };

        let (status, exit_code) = match end {
            WaitEnd::Exited(Ok(exit)) => {
                let code = exit.code();
                if descriptor.expected_exit.matches(code) {
                    (OutcomeStatus::Passed, code)
                } else {
                    (OutcomeStatus::Failed, code)
                }
            }
            WaitEnd::Exited(Err(e)) => {
                warn!("⚠️ Wait failed for {}: {e}", descriptor.id);
                self.terminate(&mut child).await;
                (OutcomeStatus::SetupError, None)
            }
            WaitEnd::TimedOut => {
                warn!("⏰ Test {} exceeded {budget:?}, terminating process group", descriptor.id);
                let code = self.terminate(&mut child).await;
                (OutcomeStatus::TimedOut, code)
            }
            WaitEnd::Cancelled => {
                debug!("🛑 Cancellation observed, terminating {}", descriptor.id);
                let code = self.terminate(&mut child).await;
                if descriptor.expected_exit.matches(code) {
                    (OutcomeStatus::Passed, code)
                } else {
                    (OutcomeStatus::Failed, code)
                }
            }
        };

        let stdout = finish_capture(join_capture(stdout_task).await);
        let stderr = finish_capture(join_capture(stderr_task).await);

        TestOutcome {
            descriptor_id: descriptor.id.clone(),
            status,
            exit_code,
            duration_ms: duration_ms(started),
            stdout,
            stderr,
            scratch_dir: None,
        }
    }

    /// Resolve the descriptor's program against the configured binary
    /// directory; absolute paths are used as-is. A missing executable is a
    /// setup error, not a framework fault.
    fn resolve_binary(&self, program: &str) -> Result<PathBuf, String> {
        let candidate = Path::new(program);
        let resolved = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.config.bin_dir.join(candidate)
        };

        if resolved.is_file() {
            Ok(resolved)
        } else {
            Err(format!("test binary not found: {}", resolved.display()))
        }
    }

    /// Terminate the child's process group gracefully (SIGTERM, grace
    /// period, SIGKILL) and reap it. Returns the exit code if one exists.
    async fn terminate(&self, child: &mut Child) -> Option<i32> {
        #[cfg(unix)]
        {
            use nix::sys::signal::{self, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = child.id() {
                let group = Pid::from_raw(pid as i32);
                if signal::killpg(group, Signal::SIGTERM).is_ok() {
                    if let Ok(Ok(exit)) = timeout(self.config.kill_grace, child.wait()).await {
                        return exit.code();
                    }
                    warn!("🔨 Process group {pid} ignored SIGTERM, sending SIGKILL");
                    let _ = signal::killpg(group, Signal::SIGKILL);
                } else {
                    let _ = child.start_kill();
                }
            } else {
                let _ = child.start_kill();
            }
        }
        #[cfg(not(unix))]
        {
            let _ = child.start_kill();
        }

        // Reap unconditionally so no zombie survives any exit path
        match child.wait().await {
            Ok(exit) => exit.code(),
            Err(_) => None,
        }
    }
}

/// Resolve completion only once cancellation is signalled; pends forever if
/// the sender goes away (cancellation can then never arrive).
async fn wait_cancelled(mut cancel: watch::Receiver<bool>) {
    if *cancel.borrow() {
        return;
    }
    while cancel.changed().await.is_ok() {
        if *cancel.borrow() {
            return;
        }
    }
    std::future::pending::<()>().await;
}

/// Read a stream to EOF, keeping at most `cap` bytes. The stream is always
/// drained fully so the child is never back-pressured by a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(mut reader: R, cap: usize) -> (String, bool) {
    let mut captured = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;

    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if captured.len() < cap {
                    let take = n.min(cap - captured.len());
                    captured.extend_from_slice(&chunk[..take]);
                    if take < n {
                        truncated = true;
                    }
                } else {
                    truncated = true;
                }
            }
            Err(_) => break,
        }
    }

    (String::from_utf8_lossy(&captured).into_owned(), truncated)
}

async fn join_capture(task: Option<tokio::task::JoinHandle<(String, bool)>>) -> (String, bool) {
    match task {
        Some(task) => task.await.unwrap_or_default(),
        None => (String::new(), false),
    }
}

fn finish_capture((mut text, truncated): (String, bool)) -> String {
    if truncated {
        text.push_str(TRUNCATION_MARKER);
    }
    text
}

fn duration_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ExpectedExit, SizeClass};
    use std::time::Duration;

    fn test_config() -> Arc<HarnessConfig> {
        Arc::new(
            HarnessConfig::builder()
                .kill_grace(Duration::from_millis(200))
                .build(),
        )
    }

    fn sh(id: &str, script: &str) -> TestCaseDescriptor {
        TestCaseDescriptor::new(id, SizeClass::Short, "/bin/sh")
            .arg("-c")
            .arg(script)
    }

    fn cancel_rx() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    #[tokio::test]
    async fn passing_subprocess_yields_passed() {
        let executor = Executor::new(test_config());
        let scratch = tempfile::tempdir().unwrap();
        let (_tx, rx) = cancel_rx();

        let outcome = executor
            .run(&sh("sh/pass", "echo hello; exit 0"), scratch.path(), rx)
            .await;

        assert_eq!(outcome.status, OutcomeStatus::Passed);
        assert_eq!(outcome.exit_code, Some(0));
        assert!(outcome.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn mismatched_exit_code_yields_failed() {
        let executor = Executor::new(test_config());
        let scratch = tempfile::tempdir().unwrap();
        let (_tx, rx) = cancel_rx();

        let outcome = executor.run(&sh("sh/fail", "exit 3"), scratch.path(), rx).await;

        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.exit_code, Some(3));
    }

    #[tokio::test]
    async fn expected_nonzero_exit_passes() {
        let executor = Executor::new(test_config());
        let scratch = tempfile::tempdir().unwrap();
        let (_tx, rx) = cancel_rx();

        let descriptor = sh("sh/expected-fail", "exit 3").expected_exit(ExpectedExit::Code(3));
        let outcome = executor.run(&descriptor, scratch.path(), rx).await;

        assert_eq!(outcome.status, OutcomeStatus::Passed);

        let any = sh("sh/any-exit", "exit 5").expected_exit(ExpectedExit::Any);
        let (_tx2, rx2) = cancel_rx();
        let outcome = executor.run(&any, scratch.path(), rx2).await;
        assert_eq!(outcome.status, OutcomeStatus::Passed);
    }

    #[tokio::test]
    async fn missing_binary_is_setup_error_not_crash() {
        let executor = Executor::new(test_config());
        let scratch = tempfile::tempdir().unwrap();
        let (_tx, rx) = cancel_rx();

        let descriptor = TestCaseDescriptor::new("ghost/TEST0", SizeClass::Short, "no_such_binary");
        let outcome = executor.run(&descriptor, scratch.path(), rx).await;

        assert_eq!(outcome.status, OutcomeStatus::SetupError);
        assert!(outcome.stderr.contains("not found"));
    }

    #[tokio::test]
    async fn scratch_dir_token_is_substituted_and_cwd_set() {
        let executor = Executor::new(test_config());
        let scratch = tempfile::tempdir().unwrap();
        let (_tx, rx) = cancel_rx();

        let descriptor = TestCaseDescriptor::new("sh/testdir", SizeClass::Short, "/bin/sh")
            .arg("-c")
            .arg("test -d \"$0\" && test \"$0\" = \"$(pwd)\"")
            .arg(SCRATCH_DIR_TOKEN);
        let outcome = executor.run(&descriptor, scratch.path(), rx).await;

        assert_eq!(outcome.status, OutcomeStatus::Passed, "stderr: {}", outcome.stderr);
    }

    #[tokio::test]
    async fn overlong_subprocess_times_out_and_is_reaped() {
        let config = Arc::new(
            HarnessConfig::builder()
                .timeout_override(Some(Duration::from_millis(300)))
                .kill_grace(Duration::from_millis(200))
                .build(),
        );
        let executor = Executor::new(config);
        let scratch = tempfile::tempdir().unwrap();
        let (_tx, rx) = cancel_rx();

        let started = Instant::now();
        let outcome = executor.run(&sh("sh/hang", "sleep 60"), scratch.path(), rx).await;

        assert_eq!(outcome.status, OutcomeStatus::TimedOut);
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "termination must not wait for the full sleep"
        );
    }

    #[tokio::test]
    async fn cancellation_terminates_running_subprocess() {
        let executor = Executor::new(test_config());
        let scratch = tempfile::tempdir().unwrap();
        let (tx, rx) = cancel_rx();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = tx.send(true);
        });

        let started = Instant::now();
        let outcome = executor.run(&sh("sh/cancelled", "sleep 60"), scratch.path(), rx).await;

        // Killed before a normal exit, so the expected-zero check fails
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn output_beyond_cap_is_truncated_with_marker() {
        let config = Arc::new(HarnessConfig::builder().max_capture_bytes(64).build());
        let executor = Executor::new(config);
        let scratch = tempfile::tempdir().unwrap();
        let (_tx, rx) = cancel_rx();

        let outcome = executor
            .run(
                &sh("sh/chatty", "i=0; while [ $i -lt 200 ]; do echo 0123456789; i=$((i+1)); done"),
                scratch.path(),
                rx,
            )
            .await;

        assert_eq!(outcome.status, OutcomeStatus::Passed);
        assert!(outcome.stdout.ends_with(TRUNCATION_MARKER));
        assert!(outcome.stdout.len() < 64 + TRUNCATION_MARKER.len() + 1);
    }
}
