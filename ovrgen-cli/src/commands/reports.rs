//! `ovrgen reports` command handler

use std::io::Write;

use colored::Colorize;
use tracing::{info, warn};

use ovrgen_core::config::OvrgenConfig;
use ovrgen_core::error::{ConfigError, OvrgenError};
use ovrgen_core::report::ReportSpec;
use ovrgen_report_engine::{
    FilterMaterializer, InvocationBuilder, Outcome, ProcessRunner, ReportEvent,
    ReportOrchestrator, RunSummary,
};

use super::StageContext;
use crate::cli::ReportsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `reports` command.
pub async fn execute(
    args: ReportsArgs,
    config: OvrgenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ctx = StageContext::new(config, &args.stage);
    let specs = select_reports(&ctx.config, &args.only)?;
    let summary = run_reports(&ctx, &specs, writer).await?;

    writer.finish(&summary)?;

    if summary.has_failures() {
        return Err(CliError::Failures(failure_message(&summary)));
    }
    Ok(())
}

/// Pick the reports to run, keeping configured order.
///
/// An empty `only` selects every report. Unknown names are a configuration error.
pub fn select_reports(config: &OvrgenConfig, only: &[String]) -> Result<Vec<ReportSpec>, CliError> {
    if let Some(unknown) = only.iter().find(|name| config.report(name).is_none()) {
        return Err(OvrgenError::from(ConfigError::InvalidValue {
            field: "--only".to_owned(),
            reason: format!("no report named '{unknown}'"),
        })
        .into());
    }

    Ok(config
        .reports
        .iter()
        .filter(|spec| only.is_empty() || only.contains(&spec.name))
        .cloned()
        .collect())
}

/// Run the report stage for the context's week.
///
/// Status lines are streamed through `writer` as each variant finishes.
pub async fn run_reports(
    ctx: &StageContext,
    specs: &[ReportSpec],
    writer: &OutputWriter,
) -> Result<RunSummary, CliError> {
    if specs.is_empty() {
        warn!("no reports configured");
        return Ok(RunSummary::default());
    }

    ctx.layout.ensure().map_err(OvrgenError::from)?;
    info!(
        week_dir = %ctx.layout.week_dir().display(),
        reports = specs.len(),
        "starting report stage"
    );

    let orchestrator = ReportOrchestrator::new(
        ProcessRunner::from_timeout_secs(ctx.config.tool.timeout_secs),
        InvocationBuilder::for_layout(&ctx.config.tool.program, &ctx.layout),
        FilterMaterializer::from_config(&ctx.config),
    );

    let mut stream_error = None;
    let summary = orchestrator
        .run_with(specs, |event| {
            if let Err(e) = writer.stream(&event) {
                stream_error = stream_error.take().or(Some(e));
            }
        })
        .await;

    match stream_error {
        Some(e) => Err(e),
        None => Ok(summary),
    }
}

pub(crate) fn failure_message(summary: &RunSummary) -> String {
    format!(
        "{} report variant(s) failed, {} report(s) could not be processed",
        summary.failed(),
        summary.errored()
    )
}

impl Render for ReportEvent<'_> {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match self {
            ReportEvent::Failed { report, error } => {
                let line = format!("Error processing report {report}: {error}");
                writeln!(w, "{}", line.red())
            }
            ReportEvent::Variant { outcome, .. } => {
                let line = outcome.outcome.status_line();
                match outcome.outcome {
                    Outcome::Success { .. } => writeln!(w, "{}", line.green()),
                    Outcome::Failure { .. } => writeln!(w, "{}", line.red()),
                }
            }
        }
    }
}

impl Render for RunSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for event in self.reports.iter().flat_map(|report| report.events()) {
            event.render_text(w)?;
        }
        Ok(())
    }
}
