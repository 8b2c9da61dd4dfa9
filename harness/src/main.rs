//! Main entry point for the pmtest binary
//!
//! Assembles the suite registry, applies CLI filters, and either lists the
//! selected tests or dispatches them through the scheduler. The process exit
//! code is 0 when every executed test passed or was skipped, 1 otherwise.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use harness::{
    HarnessConfig, ReportWriter, ResultAggregator, RunFilter, Scheduler, TestRegistry, suites,
};
use shared::SizeClass;

/// Subprocess test harness for the persistent-memory test suite
#[derive(Parser)]
#[command(name = "pmtest")]
#[command(about = "Runs compiled persistent-memory tests as isolated subprocesses")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// List registered tests without running them
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Run all or a filtered subset of registered tests
    Run {
        #[command(flatten)]
        filter: FilterArgs,

        /// Worker pool size (defaults to available parallelism)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Keep scratch directories of failing tests for diagnostics
        #[arg(long)]
        keep_failed: bool,

        /// Global timeout override in seconds, applied to every size class
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Root directory under which scratch directories are created
        #[arg(long)]
        scratch_root: Option<PathBuf>,

        /// Directory holding the compiled test binaries
        #[arg(long)]
        bin_dir: Option<PathBuf>,

        /// Write a structured JSON report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Select tests whose id contains this substring
    #[arg(long)]
    test: Option<String>,

    /// Select tests belonging to this suite
    #[arg(long)]
    suite: Option<String>,

    /// Select tests of this size class (short, medium, long)
    #[arg(long)]
    size_class: Option<SizeClass>,
}

impl FilterArgs {
    fn to_filter(&self) -> RunFilter {
        RunFilter {
            test: self.test.clone(),
            suite: self.suite.clone(),
            size_class: self.size_class,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    shared::logging::init_tracing(&cli.log_level);

    let mut registry = TestRegistry::new();
    suites::register_all(&mut registry)?;

    match cli.command {
        CliCommand::List { filter } => {
            let selected = registry.filtered(&filter.to_filter());
            for descriptor in selected.all() {
                println!("{} [{}]", descriptor.id, descriptor.size_class);
            }
            println!("{} of {} tests selected", selected.len(), registry.len());
            Ok(())
        }
        CliCommand::Run {
            filter,
            concurrency,
            keep_failed,
            timeout_secs,
            scratch_root,
            bin_dir,
            report,
        } => {
            let selected = registry.filtered(&filter.to_filter());

            let mut builder = HarnessConfig::builder()
                .keep_on_failure(keep_failed)
                .timeout_override(timeout_secs.map(Duration::from_secs));
            if let Some(concurrency) = concurrency {
                builder = builder.concurrency(concurrency);
            }
            if let Some(root) = scratch_root {
                builder = builder.scratch_root(root);
            }
            if let Some(dir) = bin_dir {
                builder = builder.bin_dir(dir);
            }
            let config = Arc::new(builder.build());

            // Ctrl-C flips the cancellation token: in-flight tests are
            // terminated, queued tests are marked skipped.
            let (cancel_tx, cancel_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("🛑 Cancellation requested, winding down the run");
                    let _ = cancel_tx.send(true);
                }
            });

            let aggregator = Arc::new(ResultAggregator::new());
            let scheduler = Scheduler::new(config);
            let outcomes = scheduler.run_all(&selected, &aggregator, cancel_rx).await?;

            let summary = aggregator.summary()?;
            tracing::info!(
                "🏁 {} total: {} passed, {} failed, {} timed out, {} setup errors, {} skipped",
                summary.total,
                summary.passed,
                summary.failed,
                summary.timed_out,
                summary.setup_errors,
                summary.skipped
            );

            if let Some(path) = report {
                ReportWriter::write_to(&path, &summary, &outcomes)?;
            }

            std::process::exit(summary.exit_code());
        }
    }
}
