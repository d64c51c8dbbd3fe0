//! Console and file logging, plus the per-task summary printed at the end
//! of a run.
//!
//! Every message goes through [`tracing`]. Stage headers, dry-run notes and
//! summary lines use dedicated targets so the console and the log file can
//! render them differently.

mod logger;
mod subscriber;

pub use logger::Logger;
pub use subscriber::init_subscriber;

const STAGE_TARGET: &str = "layout::stage";
const DRY_RUN_TARGET: &str = "layout::dry_run";
/// Summary lines carry a `status` field holding a [`TaskStatus::label`].
const SUMMARY_TARGET: &str = "layout::summary";

/// Outcome of one task, as shown in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// The task ran and the layout file is correct.
    Ok,
    /// The host is not declared in the site configuration.
    NotApplicable,
    /// The task decided not to run.
    Skipped,
    /// Changes were reported but not written.
    DryRun,
    /// The task returned an error.
    Failed,
}

impl TaskStatus {
    const ALL: [Self; 5] = [
        Self::Ok,
        Self::NotApplicable,
        Self::Skipped,
        Self::DryRun,
        Self::Failed,
    ];

    /// Short label used in the summary and the log file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// A recorded task result.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name.
    pub name: String,
    /// Final status.
    pub status: TaskStatus,
    /// Skip reason or error text.
    pub message: Option<String>,
}

/// Abstraction over logging backends.
///
/// Tasks log through this trait so tests can substitute their own
/// implementation for [`Logger`].
pub trait Log: Send + Sync {
    /// Log a stage header.
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message; shown on the console only when verbose.
    fn debug(&self, msg: &str);
    /// Log a warning.
    fn warn(&self, msg: &str);
    /// Log an error.
    fn error(&self, msg: &str);
    /// Log a change that dry-run mode did not make.
    fn dry_run(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

/// Serializes `XDG_CACHE_HOME` manipulation across parallel test threads.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// A [`Logger`] whose events reach a [`FileLayer`](subscriber::FileLayer)
/// under a temporary cache directory, for the current thread only.
///
/// Keep the returned guard alive for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let env_lock = TEST_ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    // SAFETY: Protected by TEST_ENV_MUTEX; restored before lock is released.
    #[allow(unsafe_code)]
    unsafe {
        std::env::set_var("XDG_CACHE_HOME", tmp.path());
    }
    let file_layer = subscriber::FileLayer::new("test").expect("failed to create file layer");
    let log = Logger::new("test");
    #[allow(unsafe_code)]
    unsafe {
        std::env::remove_var("XDG_CACHE_HOME");
    }
    drop(env_lock);
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}
