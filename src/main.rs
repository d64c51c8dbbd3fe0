//! `layout` command-line entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use layout_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command = args.command.name();
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    match args.command {
        cli::Command::Reconcile(opts) => commands::reconcile::run(&args.global, &opts, &log),
        cli::Command::Check => commands::check::run(&args.global, &log),
        cli::Command::Diff => commands::diff::run(&args.global, &log),
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
