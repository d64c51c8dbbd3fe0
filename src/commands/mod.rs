//! Top-level subcommand orchestration.
pub mod check;
pub mod diff;
pub mod reconcile;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::SiteConfig;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, Task};

/// Shared state produced by the common command setup sequence.
///
/// Loads the site configuration and resolves the host so that each command
/// does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded site configuration.
    pub site: Arc<SiteConfig>,
    /// Host to reconcile, possibly empty.
    pub host: String,
}

impl CommandSetup {
    /// Resolve the host and load the site configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the site configuration fails to parse.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let host = global.resolve_host();

        log.stage("Loading site configuration");
        let site = SiteConfig::load(&global.site)?;
        log.debug(&format!("{} hosts", site.hosts().count()));
        log.info(&format!("host: {host}"));
        if !host.is_empty() && !site.declares(&host) {
            log.warn(&format!(
                "host {host} is not declared in {}",
                global.site.display()
            ));
        }

        Ok(Self {
            site: Arc::new(site),
            host,
        })
    }

    /// Build the task context for `log`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host name is empty.
    pub fn context(&self, global: &GlobalOpts, log: Arc<dyn Log>) -> Result<Context> {
        Context::new(
            Arc::clone(&self.site),
            &self.host,
            global.layout.clone(),
            log,
            global.dry_run,
        )
    }
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
