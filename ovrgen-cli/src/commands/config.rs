//! `ovrgen config` command handler

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use ovrgen_core::config::OvrgenConfig;
use ovrgen_core::error::OvrgenError;
use ovrgen_core::report::ReportSpec;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Section names accepted by `config show --section`.
const SECTIONS: [&str; 5] = ["general", "tool", "collector", "feeds", "reports"];

/// Execute the `config` command.
///
/// `loaded` is the result of loading `config_path` once at startup, so
/// validation reports exactly what every other command would see.
pub fn execute(
    args: ConfigArgs,
    config_path: &Path,
    loaded: Result<OvrgenConfig, OvrgenError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, loaded, writer),
        ConfigAction::Show { section } => {
            let report = show_report(config_path, &loaded?, section.as_deref())?;
            writer.render(&report)
        }
    }
}

fn execute_validate(
    config_path: &Path,
    loaded: Result<OvrgenConfig, OvrgenError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: loaded.is_ok(),
        reports: loaded.as_ref().map(|c| c.reports.len()).unwrap_or(0),
        errors: loaded.err().map(|e| e.to_string()).into_iter().collect(),
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

/// `[[reports]]` has to stay an array of tables when shown on its own.
#[derive(Serialize)]
struct ReportsSection<'a> {
    reports: &'a [ReportSpec],
}

/// Build the `config show` payload for the whole file or a single section.
fn show_report(
    config_path: &Path,
    config: &OvrgenConfig,
    section: Option<&str>,
) -> Result<ConfigReport, CliError> {
    let config_toml = match section {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("tool") => toml::to_string_pretty(&config.tool),
        Some("collector") => toml::to_string_pretty(&config.collector),
        Some("feeds") => toml::to_string_pretty(&config.feeds),
        Some("reports") => toml::to_string_pretty(&ReportsSection {
            reports: &config.reports,
        }),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: {})",
                SECTIONS.join(", ")
            )));
        }
    }
    .map_err(|e| CliError::Command(format!("failed to serialize configuration: {e}")))?;

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section: section.map(str::to_owned),
        config_toml,
    })
}

/// Effective configuration, as TOML.
///
/// `config_toml` is text-only; JSON output carries just the source and section.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match &self.section {
            Some(section) => writeln!(
                w,
                "Configuration {} (source: {})",
                format!("[{section}]").bold(),
                self.source
            )?,
            None => writeln!(w, "Configuration (source: {})", self.source.bold())?,
        }
        writeln!(w)?;
        write!(w, "{}", self.config_toml)
    }
}

/// Result of `config validate`.
#[derive(Debug, Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Number of configured reports (0 when invalid).
    pub reports: usize,
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Config Validation: {}", self.source.bold())?;
        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
            writeln!(w, "  Reports: {}", self.reports)?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}
