//! Task results, counters, and the check-then-apply loop for one resource.
use anyhow::Result;

use super::context::Context;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use layout_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("target is a directory".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for the resources a task processed.
///
/// # Examples
///
/// ```
/// use layout_cli::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 1;
///
/// assert_eq!(stats.summary(false), "1 changed, 0 already ok");
/// assert_eq!(stats.summary(true), "1 would change, 0 already ok");
///
/// let stats = TaskStats { changed: 0, already_ok: 0, skipped: 1 };
/// assert_eq!(stats.summary(false), "0 changed, 0 already ok, 1 skipped");
/// ```
#[derive(Debug, Default)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items skipped.
    pub skipped: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "1 changed, 0 already ok").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.skipped > 0 {
            format!(
                "{} {verb}, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

/// Check a resource and apply it when it is missing or incorrect.
///
/// In dry-run mode the change is only logged.
///
/// # Errors
///
/// Returns an error if the state check or the apply fails.
pub fn process_resource<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource.current_state()? {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if ctx.dry_run {
                let msg = if let ResourceState::Incorrect { ref current } = state {
                    format!("would {verb} {desc} (currently {current})")
                } else {
                    format!("would {verb}: {desc}")
                };
                ctx.log.dry_run(&msg);
                delta.changed += 1;
                return Ok(delta);
            }
            match resource.apply()? {
                ResourceChange::Applied => {
                    ctx.log.info(&format!("{verb}: {desc}"));
                    delta.changed += 1;
                }
                ResourceChange::AlreadyCorrect => delta.already_ok += 1,
                ResourceChange::Skipped { reason } => {
                    ctx.log.warn(&format!("skipped {desc}: {reason}"));
                    delta.skipped += 1;
                }
            }
        }
    }
    Ok(delta)
}
