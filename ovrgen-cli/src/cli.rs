//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// ovrgen -- weekly filtered OpenVAS report generation.
///
/// Use `ovrgen <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "ovrgen", version, about, long_about = None)]
pub struct Cli {
    /// Path to the ovrgen.toml configuration file.
    #[arg(short, long, global = true, default_value = "ovrgen.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable status lines.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full weekly job: feeds, report collection, report generation.
    Run(StageArgs),

    /// Generate reports only.
    Reports(ReportsArgs),

    /// Refresh the CISA and Microsoft identifier lists only.
    Feeds(StageArgs),

    /// Copy exported scan reports into the week's report directory only.
    Collect(StageArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

/// Options shared by every stage command.
#[derive(Args, Debug, Clone, Default)]
pub struct StageArgs {
    /// Date that selects the week directory and the Microsoft update month
    /// (YYYY-MM-DD, default: today).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

// ---- reports ----

/// Generate filtered reports.
#[derive(Args, Debug)]
pub struct ReportsArgs {
    /// Only run the named report (repeatable).
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    #[command(flatten)]
    pub stage: StageArgs,
}

// ---- config ----

/// Manage ovrgen configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, tool, collector, feeds, reports).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["ovrgen", "run"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("ovrgen.toml"));
        assert_eq!(cli.output, OutputFormat::Text);
        match cli.command {
            Commands::Run(stage) => assert!(stage.date.is_none()),
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_with_date() {
        let cli = Cli::try_parse_from(["ovrgen", "run", "--date", "2024-03-12"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Run(stage) => {
                assert_eq!(stage.date, NaiveDate::from_ymd_opt(2024, 3, 12));
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_invalid_date_fails() {
        assert!(Cli::try_parse_from(["ovrgen", "feeds", "--date", "2024-13-40"]).is_err());
    }

    #[test]
    fn test_cli_parse_reports_only_repeatable() {
        let cli = Cli::try_parse_from([
            "ovrgen", "reports", "--only", "servers", "--only", "workstations",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Reports(args) => {
                assert_eq!(args.only, vec!["servers", "workstations"]);
                assert!(args.stage.date.is_none());
            }
            _ => panic!("expected Reports command"),
        }
    }

    #[test]
    fn test_cli_parse_reports_without_filter() {
        let cli = Cli::try_parse_from(["ovrgen", "reports"]).expect("parse succeeded");
        match cli.command {
            Commands::Reports(args) => assert!(args.only.is_empty()),
            _ => panic!("expected Reports command"),
        }
    }

    #[test]
    fn test_cli_parse_feeds_and_collect() {
        let cli = Cli::try_parse_from(["ovrgen", "feeds"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Feeds(_)));
        let cli = Cli::try_parse_from(["ovrgen", "collect"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Collect(_)));
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["ovrgen", "config", "show", "--section", "tool"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => assert_eq!(section.as_deref(), Some("tool")),
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ovrgen",
            "reports",
            "-c",
            "/etc/ovrgen/ovrgen.toml",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/ovrgen/ovrgen.toml"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["ovrgen"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "ovrgen");
        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for expected in ["run", "reports", "feeds", "collect", "config"] {
            assert!(
                subcommands.contains(&expected),
                "should have '{expected}' subcommand"
            );
        }
    }
}
