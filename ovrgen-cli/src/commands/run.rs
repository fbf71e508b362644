//! `ovrgen run` command handler -- the full weekly job
//!
//! Stages run in order: feeds (if enabled), collection (if enabled), reports.
//! A failing feed never prevents collection or report generation.
//! In text mode each stage prints as soon as it finishes.

use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;
use tracing::{info, warn};

use ovrgen_core::config::OvrgenConfig;
use ovrgen_feeds::FeedSummary;
use ovrgen_report_engine::{CollectSummary, RunSummary};

use super::{StageContext, collect, feeds, reports};
use crate::cli::StageArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
pub async fn execute(
    args: StageArgs,
    config: OvrgenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ctx = StageContext::new(config, &args);
    info!(date = %ctx.today, week_dir = %ctx.layout.week_dir().display(), "weekly run starting");
    writer.stream(&WeekHeader(ctx.layout.week_dir()))?;

    let mut feed_error = None;
    let feeds = if ctx.config.feeds.enabled {
        match feeds::run_feeds(&ctx).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "feed stage could not start, continuing");
                feed_error = Some(e.to_string());
                None
            }
        }
    } else {
        None
    };
    if let Some(summary) = &feeds {
        writer.stream(summary)?;
    }
    if let Some(error) = &feed_error {
        writer.stream(&FeedStageError(error))?;
    }

    let collect = if ctx.config.collector.enabled {
        Some(collect::run_collect(&ctx).await?)
    } else {
        None
    };
    if let Some(summary) = &collect {
        writer.stream(summary)?;
    }

    let specs = reports::select_reports(&ctx.config, &[])?;
    let reports = reports::run_reports(&ctx, &specs, writer).await?;

    let report = WeeklyRunReport {
        week_dir: ctx.layout.week_dir().to_path_buf(),
        feeds,
        feed_error,
        collect,
        reports,
    };
    writer.finish(&report)?;

    if report.has_failures() {
        let mut message = reports::failure_message(&report.reports);
        if report.feed_error.is_some() || report.feeds.as_ref().is_some_and(FeedSummary::has_failures) {
            message.push_str(", feed update failed");
        }
        return Err(CliError::Failures(message));
    }
    Ok(())
}

/// Combined result of one weekly run.
#[derive(Serialize)]
pub struct WeeklyRunReport {
    pub week_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feeds: Option<FeedSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect: Option<CollectSummary>,
    pub reports: RunSummary,
}

impl WeeklyRunReport {
    fn has_failures(&self) -> bool {
        self.reports.has_failures()
            || self.feed_error.is_some()
            || self.feeds.as_ref().is_some_and(FeedSummary::has_failures)
    }
}

struct WeekHeader<'a>(&'a Path);

impl Render for WeekHeader<'_> {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Week directory: {}", self.0.display().to_string().bold())
    }
}

struct FeedStageError<'a>(&'a str);

impl Render for FeedStageError<'_> {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", format!("Error updating feeds: {}", self.0).red())
    }
}

impl Render for WeeklyRunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        WeekHeader(&self.week_dir).render_text(w)?;
        if let Some(feeds) = &self.feeds {
            feeds.render_text(w)?;
        }
        if let Some(error) = &self.feed_error {
            FeedStageError(error).render_text(w)?;
        }
        if let Some(collect) = &self.collect {
            collect.render_text(w)?;
        }
        self.reports.render_text(w)
    }
}
