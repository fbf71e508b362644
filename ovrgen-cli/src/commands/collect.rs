//! `ovrgen collect` command handler

use std::io::Write;

use colored::Colorize;
use tracing::info;

use ovrgen_core::config::OvrgenConfig;
use ovrgen_core::error::OvrgenError;
use ovrgen_report_engine::{CollectSummary, DirectoryCollector, ReportCollector};

use super::StageContext;
use crate::cli::StageArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `collect` command.
///
/// Missing task exports are reported but do not fail the command.
pub async fn execute(
    args: StageArgs,
    config: OvrgenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ctx = StageContext::new(config, &args);
    let summary = run_collect(&ctx).await?;
    writer.render(&summary)?;
    Ok(())
}

/// Copy every configured task export into the week's report directory.
pub async fn run_collect(ctx: &StageContext) -> Result<CollectSummary, CliError> {
    ctx.layout.ensure().map_err(OvrgenError::from)?;

    let collector = DirectoryCollector::new(&ctx.config.collector.source_dir);
    info!(
        source = %collector.source_dir().display(),
        report_dir = %ctx.layout.report_dir().display(),
        tasks = ctx.config.collector.tasks.len(),
        "starting collection stage"
    );

    Ok(collector
        .collect(&ctx.config.collector.tasks, ctx.layout.report_dir())
        .await?)
}

impl Render for CollectSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for path in &self.collected {
            writeln!(w, "{}", format!("Report {} collected.", path.display()).green())?;
        }
        for task in &self.missing {
            writeln!(w, "{}", format!("No exported report for task {task}.").yellow())?;
        }
        Ok(())
    }
}
