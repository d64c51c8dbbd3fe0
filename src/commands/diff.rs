//! Command: print the pending layout changes as a unified diff.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::layout::module;
use crate::logging::Logger;

/// Run the diff command.
///
/// Prints nothing when the layout file is up to date or the host is not
/// declared.
///
/// # Errors
///
/// Returns an error if the site configuration cannot be loaded or the layout
/// cannot be reconciled.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    if !module::check(&setup.site, &setup.host) {
        log.info(&format!("host {} runs no managed services", setup.host));
        return Ok(());
    }

    let outcome = module::run(&setup.site, &setup.host, &global.layout)?;
    log.debug(&outcome.plan.summary());
    print!("{}", outcome.diff(&global.layout));
    Ok(())
}
