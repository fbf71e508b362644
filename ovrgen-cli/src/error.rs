//! CLI-specific error types and exit code mapping

use ovrgen_core::error::OvrgenError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The stage ran to completion but at least one report variant or feed failed.
    #[error("{0}")]
    Failures(String),

    /// Interrupted by Ctrl-C.
    #[error("interrupted")]
    Interrupted,

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from ovrgen-core.
    #[error("{0}")]
    Core(#[from] OvrgenError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration error                       |
    /// | 3    | A report variant or feed failed           |
    /// | 10   | IO error                                  |
    /// | 130  | Interrupted                               |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(OvrgenError::Config(_)) => 2,
            Self::Failures(_) => 3,
            Self::Io(_) | Self::Core(OvrgenError::Io(_)) => 10,
            Self::Interrupted => 130,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ovrgen_report_engine::ReportEngineError> for CliError {
    fn from(e: ovrgen_report_engine::ReportEngineError) -> Self {
        Self::Core(e.into())
    }
}

impl From<ovrgen_feeds::FeedIngestError> for CliError {
    fn from(e: ovrgen_feeds::FeedIngestError) -> Self {
        Self::Core(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovrgen_core::error::{ConfigError, ReportError};

    #[test]
    fn test_exit_code_config_error() {
        assert_eq!(CliError::Config("bad".to_owned()).exit_code(), 2);
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err: CliError = OvrgenError::Config(ConfigError::FileNotFound {
            path: "ovrgen.toml".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 2, "core config errors map to exit code 2");
    }

    #[test]
    fn test_exit_code_failures() {
        assert_eq!(CliError::Failures("1 variant failed".to_owned()).exit_code(), 3);
    }

    #[test]
    fn test_exit_code_io_error() {
        let err = CliError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.exit_code(), 10);
        let core: CliError = OvrgenError::Io(std::io::Error::other("disk")).into();
        assert_eq!(core.exit_code(), 10);
    }

    #[test]
    fn test_exit_code_command_and_domain_errors() {
        assert_eq!(CliError::Command("x".to_owned()).exit_code(), 1);
        let workspace: CliError =
            OvrgenError::Report(ReportError::Workspace("/w: denied".to_owned())).into();
        assert_eq!(workspace.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_interrupted() {
        assert_eq!(CliError::Interrupted.exit_code(), 130);
    }

    #[test]
    fn test_from_engine_error() {
        let err: CliError = ovrgen_report_engine::ReportEngineError::Collect {
            path: "/exports/servers-report.xml".to_owned(),
            source: std::io::Error::other("denied"),
        }
        .into();
        assert!(matches!(err, CliError::Core(OvrgenError::Report(_))));
        assert!(err.to_string().contains("servers-report.xml"));
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        assert_eq!(err.to_string(), "configuration error: invalid TOML syntax");
    }
}
