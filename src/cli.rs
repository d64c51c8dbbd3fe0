//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the layout reconciliation engine.
#[derive(Parser, Debug)]
#[command(
    name = "layout",
    about = "Reconcile a host's layout file with the site configuration",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Site configuration listing the services of every host
    #[arg(long, global = true, env = "LAYOUT_SITE", default_value = "site.toml")]
    pub site: PathBuf,

    /// Layout file to reconcile
    #[arg(long, global = true, env = "LAYOUT_FILE", default_value = "layout.conf")]
    pub layout: PathBuf,

    /// Host whose services are reconciled (defaults to $HOSTNAME)
    #[arg(long, global = true, env = "LAYOUT_HOST")]
    pub host: Option<String>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

impl GlobalOpts {
    /// The host to reconcile: `--host`, else the `HOSTNAME` environment
    /// variable, else empty.
    #[must_use]
    pub fn resolve_host(&self) -> String {
        self.host
            .clone()
            .or_else(|| std::env::var("HOSTNAME").ok())
            .unwrap_or_default()
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite the layout file so it runs exactly the wanted services
    Reconcile(ReconcileOpts),
    /// Report whether the layout file is up to date
    Check,
    /// Show the changes reconcile would make as a unified diff
    Diff,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Reconcile(_) => "reconcile",
            Self::Check => "check",
            Self::Diff => "diff",
            Self::Version => "version",
        }
    }
}

/// Options for the `reconcile` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ReconcileOpts {
    /// Do not keep a timestamped copy of the replaced layout file
    #[arg(long = "no-backup", action = clap::ArgAction::SetFalse)]
    pub backup: bool,
}
