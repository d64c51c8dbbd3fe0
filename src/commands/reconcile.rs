//! Command: reconcile and install the layout file.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, ReconcileOpts};
use crate::logging::{Log, Logger};
use crate::tasks;

/// Run the reconcile command.
///
/// # Errors
///
/// Returns an error if the site configuration cannot be loaded, the host is
/// unknown, or any task fails.
pub fn run(global: &GlobalOpts, opts: &ReconcileOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("layout {}", super::version::VERSION));

    let setup = super::CommandSetup::init(global, log)?;
    let mut ctx = setup.context(global, Arc::clone(log) as Arc<dyn Log>)?;
    ctx.backup = opts.backup;

    let tasks = tasks::all_reconcile_tasks();
    super::run_tasks_to_completion(tasks.iter().map(Box::as_ref), &ctx, log)
}
