//! Shared state handed to every task.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::SiteConfig;
use crate::logging::Log;

/// Shared context for task execution.
pub struct Context {
    /// Site configuration describing the wanted services.
    pub site: Arc<SiteConfig>,
    /// Host whose layout is reconciled.
    pub host: String,
    /// Layout file to reconcile.
    pub layout_path: PathBuf,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Whether to back up the layout file before replacing it.
    pub backup: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("site", &self.site)
            .field("host", &self.host)
            .field("layout_path", &self.layout_path)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("backup", &self.backup)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is empty.
    pub fn new(
        site: Arc<SiteConfig>,
        host: &str,
        layout_path: PathBuf,
        log: Arc<dyn Log>,
        dry_run: bool,
    ) -> Result<Self> {
        if host.trim().is_empty() {
            anyhow::bail!("host name is empty; pass --host or set LAYOUT_HOST");
        }
        Ok(Self {
            site,
            host: host.to_string(),
            layout_path,
            log,
            dry_run,
            backup: true,
        })
    }
}
