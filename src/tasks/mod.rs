//! Named tasks that orchestrate resource changes.
mod context;
mod processing;
pub mod reconcile;

pub use context::Context;
pub use processing::{TaskResult, TaskStats, process_resource};

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the host in `ctx`.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails, such as when the layout file
    /// cannot be parsed, a wanted service cannot be placed, or the file
    /// cannot be written.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The tasks run by the reconcile command.
#[must_use]
pub fn all_reconcile_tasks() -> Vec<Box<dyn Task>> {
    vec![Box::new(reconcile::ReconcileLayout)]
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_helpers::make_static_context;

    /// A mock task for testing `execute()`.
    struct MockTask {
        should_run: bool,
        result: Result<TaskResult, String>,
    }

    impl Task for MockTask {
        fn name(&self) -> &'static str {
            "mock"
        }
        fn should_run(&self, _ctx: &Context) -> bool {
            self.should_run
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            self.result.clone().map_err(|s| anyhow::anyhow!("{s}"))
        }
    }

    fn status_after(task: &MockTask) -> TaskStatus {
        let (ctx, log, _dir) = make_static_context("");
        execute(task, &ctx);
        log.task_entries()[0].status
    }

    #[test]
    fn execute_skips_non_applicable_task() {
        let task = MockTask {
            should_run: false,
            result: Ok(TaskResult::Ok),
        };
        assert_eq!(status_after(&task), TaskStatus::NotApplicable);
    }

    #[test]
    fn execute_records_ok_task() {
        let task = MockTask {
            should_run: true,
            result: Ok(TaskResult::Ok),
        };
        assert_eq!(status_after(&task), TaskStatus::Ok);
    }

    #[test]
    fn execute_records_failed_task() {
        let (ctx, log, _dir) = make_static_context("");
        let task = MockTask {
            should_run: true,
            result: Err("kaboom".to_string()),
        };
        execute(&task, &ctx);
        assert_eq!(log.failure_count(), 1);
        assert_eq!(log.task_entries()[0].message.as_deref(), Some("kaboom"));
    }

    #[test]
    fn execute_records_skipped_task() {
        let task = MockTask {
            should_run: true,
            result: Ok(TaskResult::Skipped("not needed".to_string())),
        };
        assert_eq!(status_after(&task), TaskStatus::Skipped);
    }

    #[test]
    fn execute_records_dry_run_task() {
        let task = MockTask {
            should_run: true,
            result: Ok(TaskResult::DryRun),
        };
        assert_eq!(status_after(&task), TaskStatus::DryRun);
    }

    #[test]
    fn reconcile_task_list_is_not_empty() {
        assert_eq!(all_reconcile_tasks()[0].name(), "Reconcile layout");
    }
}
