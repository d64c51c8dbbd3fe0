//! The layout reconciliation task.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_resource};
use crate::layout::module;
use crate::resources::layout_file::LayoutFileResource;

/// Reconcile the host's layout file with the site configuration.
#[derive(Debug)]
pub struct ReconcileLayout;

impl Task for ReconcileLayout {
    fn name(&self) -> &'static str {
        "Reconcile layout"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        module::check(&ctx.site, &ctx.host)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let outcome = module::run(&ctx.site, &ctx.host, &ctx.layout_path)?;
        let plan = &outcome.plan;

        for addition in &plan.add {
            ctx.log.debug(&format!("add {addition}"));
        }
        for target in &plan.enable {
            ctx.log.debug(&format!("enable {target}"));
        }
        for target in &plan.disable {
            ctx.log.debug(&format!("disable {target}"));
        }
        if plan.is_empty() {
            ctx.log.debug("services already match the site configuration");
        }
        ctx.log.info(&format!("services: {}", plan.summary()));

        let resource = LayoutFileResource::new(ctx.layout_path.clone(), outcome.rendered);
        let resource = if ctx.backup {
            resource
        } else {
            resource.without_backup()
        };
        let stats = process_resource(ctx, &resource, "write")?;
        Ok(stats.finish(ctx))
    }
}
