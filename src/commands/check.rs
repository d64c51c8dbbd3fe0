//! Command: report whether the layout file is up to date.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::layout::module;
use crate::logging::Logger;

/// Run the check command.
///
/// A host the site does not declare has nothing to check and passes.
///
/// # Errors
///
/// Returns an error if the layout cannot be reconciled or the file on disk
/// differs from the reconciled layout.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;

    log.stage("Checking layout");
    if !module::check(&setup.site, &setup.host) {
        log.info(&format!("host {} runs no managed services", setup.host));
        return Ok(());
    }

    let outcome = module::run(&setup.site, &setup.host, &global.layout)?;
    if outcome.changed() {
        anyhow::bail!(
            "{} is out of date: {}",
            global.layout.display(),
            outcome.plan.summary()
        );
    }

    log.info(&format!(
        "{} is up to date ({} services)",
        global.layout.display(),
        outcome.plan.kept.len()
    ));
    Ok(())
}
