//! `ovrgen feeds` command handler

use std::io::Write;
use std::time::Duration;

use colored::Colorize;
use tracing::info;

use ovrgen_core::config::OvrgenConfig;
use ovrgen_feeds::{FeedIngester, FeedSummary, HttpFetcher};

use super::StageContext;
use crate::cli::StageArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `feeds` command.
///
/// Runs even when `feeds.enabled` is false; the flag only gates `ovrgen run`.
pub async fn execute(
    args: StageArgs,
    config: OvrgenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ctx = StageContext::new(config, &args);
    let summary = run_feeds(&ctx).await?;

    writer.render(&summary)?;

    if summary.has_failures() {
        return Err(CliError::Failures("feed update failed".to_owned()));
    }
    Ok(())
}

/// Refresh both identifier lists into the work directory.
pub async fn run_feeds(ctx: &StageContext) -> Result<FeedSummary, CliError> {
    let workdir = ctx.config.general.workdir_path();
    tokio::fs::create_dir_all(&workdir).await?;

    let timeout = Duration::from_secs(ctx.config.feeds.request_timeout_secs);
    let fetcher = HttpFetcher::new(timeout)?;
    info!(workdir = %workdir.display(), "starting feed stage");

    let ingester = FeedIngester::new(fetcher, ctx.config.feeds.clone(), workdir);
    Ok(ingester.run(ctx.today).await)
}

impl Render for FeedSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for feed in &self.feeds {
            let line = feed.status_line();
            if feed.is_success() {
                writeln!(w, "{}", line.green())?;
            } else {
                writeln!(w, "{}", line.red())?;
            }
        }
        Ok(())
    }
}
