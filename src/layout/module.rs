//! Entry points for the per-host module runner.
//!
//! [`check`] decides whether reconciliation applies to a host; [`run`]
//! produces the reconciled layout text without writing it.
use anyhow::{Context as _, Result};
use std::path::Path;

use super::reconciler::{self, ReconcilePlan};
use super::{parser, serializer};
use crate::config::SiteConfig;

/// Result of reconciling a layout file in memory.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// File content before reconciliation, `None` when the file is missing.
    pub previous: Option<String>,
    /// Reconciled file content.
    pub rendered: String,
    /// Changes that were applied to the document.
    pub plan: ReconcilePlan,
}

impl ReconcileOutcome {
    /// Whether the rendered text differs from the file on disk.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous.as_deref() != Some(self.rendered.as_str())
    }

    /// Unified diff from the previous to the rendered content, empty when
    /// nothing changed.
    #[must_use]
    pub fn diff(&self, path: &Path) -> String {
        if !self.changed() {
            return String::new();
        }
        similar::TextDiff::from_lines(self.previous.as_deref().unwrap_or_default(), &self.rendered)
            .unified_diff()
            .header(
                &format!("a/{}", path.display()),
                &format!("b/{}", path.display()),
            )
            .to_string()
    }
}

/// Whether `host` takes part in layout reconciliation.
///
/// A host declared in the site configuration qualifies even with an empty
/// service list, so that its stale services get disabled.
#[must_use]
pub fn check(site: &SiteConfig, host: &str) -> bool {
    site.declares(host)
}

/// Reconcile the layout file at `path` with the services `site` wants on
/// `host`.
///
/// # Errors
///
/// Returns an error if the site entry for `host` is invalid, the layout
/// file cannot be read or parsed, or a wanted service cannot be placed.
pub fn run(site: &SiteConfig, host: &str, path: &Path) -> Result<ReconcileOutcome> {
    let wanted = site
        .wanted_services(host)
        .with_context(|| format!("reading wanted services for {host}"))?;

    let (previous, mut doc) = parser::read_file(path)?;

    let plan = reconciler::reconcile(&wanted, &mut doc)
        .with_context(|| format!("reconciling {}", path.display()))?;

    Ok(ReconcileOutcome {
        previous,
        rendered: serializer::to_string(&doc),
        plan,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;

    fn site(toml: &str) -> SiteConfig {
        SiteConfig::from_toml_str(toml).expect("test site should parse")
    }

    #[test]
    fn check_requires_declared_host() {
        let site = site("[hosts.h1]\nservices = []\n");
        assert!(check(&site, "h1"));
        assert!(!check(&site, "h2"));
    }

    #[test]
    fn run_on_missing_file_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.conf");
        let site = site("[hosts.h1]\nservices = [{ type = \"admin\" }]\n");

        let outcome = run(&site, "h1", &path).unwrap();

        assert!(outcome.previous.is_none());
        assert!(outcome.changed());
        assert_eq!(
            outcome.rendered,
            "[dCacheDomain]\n\n[dCacheDomain/admin]\nhost=h1\ntype=admin\n\n"
        );
        assert!(!path.exists(), "run must not write the file");
    }

    #[test]
    fn unchanged_layout_has_empty_diff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.conf");
        std::fs::write(&path, "[info]\n[info/info]\nhost=h1\n").unwrap();
        let site = site("[hosts.h1]\nservices = [{ type = \"info\" }]\n");

        let outcome = run(&site, "h1", &path).unwrap();

        assert!(!outcome.changed());
        assert!(outcome.plan.is_empty());
        assert_eq!(outcome.diff(&path), "");
    }

    #[test]
    fn diff_shows_disabled_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.conf");
        std::fs::write(&path, "[info]\n[info/info]\nhost=h1\n").unwrap();
        let site = site("[hosts.h1]\nservices = []\n");

        let diff = run(&site, "h1", &path).unwrap().diff(&path);

        assert!(diff.contains("-host=h1"), "{diff}");
        assert!(diff.contains("+# host=h1"), "{diff}");
    }

    #[test]
    fn unresolvable_service_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.conf");
        let site = site("[hosts.h1]\nservices = [{ type = \"unknown-type\" }]\n");

        let err = run(&site, "h1", &path).unwrap_err();

        assert!(format!("{err:#}").contains("layout.conf"));
        assert!(
            err.chain()
                .any(|cause| cause.downcast_ref::<ReconcileError>().is_some()),
            "expected a ReconcileError in {err:#}"
        );
    }

    #[test]
    fn malformed_layout_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.conf");
        std::fs::write(&path, "[]\n").unwrap();
        let site = site("[hosts.h1]\nservices = []\n");

        let err = run(&site, "h1", &path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn crlf_layout_stays_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.conf");
        std::fs::write(&path, "[info]\r\n[info/info]\r\nhost=h1\r\n").unwrap();
        let site = site("[hosts.h1]\nservices = [{ type = \"info\" }, { type = \"admin\" }]\n");

        let outcome = run(&site, "h1", &path).unwrap();

        assert_eq!(
            outcome.rendered,
            "[info]\r\n[info/info]\r\nhost=h1\r\n\
             [dCacheDomain]\r\n\r\n[dCacheDomain/admin]\r\nhost=h1\r\ntype=admin\r\n\r\n"
        );
        assert!(!outcome.rendered.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn unchanged_crlf_layout_is_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.conf");
        std::fs::write(&path, "[info]\r\n[info/info]\r\nhost=h1\r\n").unwrap();
        let site = site("[hosts.h1]\nservices = [{ type = \"info\" }]\n");

        let outcome = run(&site, "h1", &path).unwrap();

        assert!(!outcome.changed(), "{:?}", outcome.rendered);
        assert_eq!(outcome.diff(&path), "");
    }
}
