// Shared helpers for integration tests.
//
// Provides a temporary directory holding a site configuration and a layout
// file, plus a fluent builder so each integration test can set up an
// isolated environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use layout_cli::cli::GlobalOpts;
use layout_cli::logging::Logger;

/// Host used by integration tests.
pub const HOST: &str = "head.example.org";

/// An isolated site directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory containing `site.toml` and `layout.conf`.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with an empty site configuration and no layout
    /// file.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::write(root.path().join("site.toml"), "").expect("write site.toml");
        Self { root }
    }

    /// Path to the site configuration.
    pub fn site_path(&self) -> PathBuf {
        self.root.path().join("site.toml")
    }

    /// Path to the layout file.
    pub fn layout_path(&self) -> PathBuf {
        self.root.path().join("layout.conf")
    }

    /// Global options pointing at this context, reconciling `host`.
    pub fn global(&self, host: &str) -> GlobalOpts {
        GlobalOpts {
            site: self.site_path(),
            layout: self.layout_path(),
            host: Some(host.to_string()),
            dry_run: false,
        }
    }

    /// Global options for a dry run.
    pub fn dry_run(&self, host: &str) -> GlobalOpts {
        GlobalOpts {
            dry_run: true,
            ..self.global(host)
        }
    }

    /// Fresh logger for one command invocation.
    pub fn logger(&self) -> Arc<Logger> {
        Arc::new(Logger::new("test"))
    }

    /// Current content of the layout file.
    pub fn read_layout(&self) -> String {
        std::fs::read_to_string(self.layout_path()).expect("read layout file")
    }

    /// Timestamped backups of the layout file.
    pub fn backups(&self) -> Vec<PathBuf> {
        backups_in(self.root.path())
    }
}

fn backups_in(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("read temp dir")
        .map(|entry| entry.expect("read dir entry").path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("layout.conf."))
        })
        .collect();
    found.sort();
    found
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `site.toml`.
    pub fn with_site(self, content: &str) -> Self {
        std::fs::write(self.ctx.site_path(), content).expect("write site.toml");
        self
    }

    /// Write `content` to `layout.conf`.
    pub fn with_layout(self, content: &str) -> Self {
        std::fs::write(self.ctx.layout_path(), content).expect("write layout.conf");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
