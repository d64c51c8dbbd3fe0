//! [`Logger`], the [`Log`] implementation the commands use.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::log_file_path;
use super::{DRY_RUN_TARGET, Log, STAGE_TARGET, SUMMARY_TARGET, TaskEntry, TaskStatus};

/// Implement the `fn(&self, &str)` methods of [`Log`] by delegating to the
/// inherent methods of the same name.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that collects task results for the run summary.
///
/// Messages are also appended to `$XDG_CACHE_HOME/layout/<command>.log`
/// once [`init_subscriber`](super::init_subscriber) has run.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`, remembering its log file path for the
    /// summary.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    #[cfg(test)]
    pub(crate) const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Every recorded task result, in order.
    pub(crate) fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Log an error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a change that dry-run mode did not make.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Number of tasks recorded as failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.task_entries()
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .count()
    }

    /// Log one line per recorded task, then the totals and the log path.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");
        for task in &tasks {
            let line = task
                .message
                .as_ref()
                .map_or_else(|| task.name.clone(), |msg| format!("{} ({msg})", task.name));
            tracing::info!(target: SUMMARY_TARGET, status = task.status.label(), "{line}");
        }
        self.info(&totals(&tasks));

        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}

/// `"2 tasks: 1 ok, 1 failed"`, naming only the statuses that occurred.
fn totals(tasks: &[TaskEntry]) -> String {
    let counts: Vec<String> = TaskStatus::ALL
        .iter()
        .filter_map(|&status| {
            let n = tasks.iter().filter(|t| t.status == status).count();
            (n > 0).then(|| format!("{n} {}", status.label()))
        })
        .collect();
    let noun = if tasks.len() == 1 { "task" } else { "tasks" };
    format!("{} {noun}: {}", tasks.len(), counts.join(", "))
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}
