//! 설정 관리 -- ovrgen.toml 파싱 및 런타임 설정
//!
//! [`OvrgenConfig`]는 모든 단계(피드 수집, 리포트 수집, 리포트 생성)의 설정을 담는
//! 최상위 구조체입니다. 전역 상태로 두지 않고 각 단계의 진입점에 명시적으로 전달합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`OVRGEN_TOOL_PROGRAM=/opt/bin/openvasreporting` 형식)
//! 3. 설정 파일 (`ovrgen.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), ovrgen_core::error::OvrgenError> {
//! use ovrgen_core::config::OvrgenConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = OvrgenConfig::load("ovrgen.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = OvrgenConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, OvrgenError};
use crate::report::ReportSpec;

/// ovrgen 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OvrgenConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 외부 리포트 도구 설정
    #[serde(default)]
    pub tool: ToolConfig,
    /// 스캔 리포트 수집 설정
    #[serde(default)]
    pub collector: CollectorConfig,
    /// 취약점 피드 설정
    #[serde(default)]
    pub feeds: FeedsConfig,
    /// 리포트 명세 목록 (설정 순서 유지)
    #[serde(default)]
    pub reports: Vec<ReportSpec>,
}

impl OvrgenConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용한 뒤 검증합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, OvrgenError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일을 파싱만 합니다 (환경변수 오버라이드와 검증 없음).
    ///
    /// 검증은 오버라이드 이후 [`OvrgenConfig::load`]에서 한 번만 수행됩니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, OvrgenError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OvrgenError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                OvrgenError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    ///
    /// 비어 있는 필터 카테고리는 이 단계에서 제거됩니다.
    pub fn parse(toml_str: &str) -> Result<Self, OvrgenError> {
        let mut config: Self = toml::from_str(toml_str).map_err(|e| {
            OvrgenError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })?;
        for report in &mut config.reports {
            report.normalize();
        }
        Ok(config)
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `OVRGEN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "OVRGEN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "OVRGEN_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.workdir, "OVRGEN_GENERAL_WORKDIR");

        // Tool
        override_string(&mut self.tool.program, "OVRGEN_TOOL_PROGRAM");
        override_u64(&mut self.tool.timeout_secs, "OVRGEN_TOOL_TIMEOUT_SECS");
        override_string(&mut self.tool.scratch_dir, "OVRGEN_TOOL_SCRATCH_DIR");

        // Collector
        override_bool(&mut self.collector.enabled, "OVRGEN_COLLECTOR_ENABLED");
        override_string(&mut self.collector.source_dir, "OVRGEN_COLLECTOR_SOURCE_DIR");
        override_csv(&mut self.collector.tasks, "OVRGEN_COLLECTOR_TASKS");

        // Feeds
        override_bool(&mut self.feeds.enabled, "OVRGEN_FEEDS_ENABLED");
        override_string(&mut self.feeds.cisa_url, "OVRGEN_FEEDS_CISA_URL");
        override_string(&mut self.feeds.cisa_file, "OVRGEN_FEEDS_CISA_FILE");
        override_string(&mut self.feeds.ms_url, "OVRGEN_FEEDS_MS_URL");
        override_string(&mut self.feeds.ms_file, "OVRGEN_FEEDS_MS_FILE");
        override_u64(
            &mut self.feeds.request_timeout_secs,
            "OVRGEN_FEEDS_REQUEST_TIMEOUT_SECS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 실패 시 어떤 외부 도구 실행보다 먼저 전체 실행을 중단해야 합니다.
    pub fn validate(&self) -> Result<(), OvrgenError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.general.workdir.is_empty() {
            return Err(invalid("general.workdir", "must not be empty"));
        }

        if self.tool.program.is_empty() {
            return Err(invalid("tool.program", "must not be empty"));
        }

        if self.collector.enabled && self.collector.source_dir.is_empty() {
            return Err(invalid(
                "collector.source_dir",
                "must not be empty when collector is enabled",
            ));
        }

        for (idx, task) in self.collector.tasks.iter().enumerate() {
            if task.is_empty() || task.contains(['/', '\\']) {
                return Err(invalid(
                    &format!("collector.tasks[{idx}]"),
                    format!("'{task}' must be a non-empty task name without path separators"),
                ));
            }
        }

        if self.feeds.enabled {
            for (field, value) in [
                ("feeds.cisa_url", &self.feeds.cisa_url),
                ("feeds.cisa_file", &self.feeds.cisa_file),
                ("feeds.ms_url", &self.feeds.ms_url),
                ("feeds.ms_file", &self.feeds.ms_file),
            ] {
                if value.is_empty() {
                    return Err(invalid(field, "must not be empty when feeds are enabled"));
                }
            }
            if self.feeds.request_timeout_secs == 0 {
                return Err(invalid(
                    "feeds.request_timeout_secs",
                    "must be greater than 0 when feeds are enabled",
                ));
            }
        }

        let mut names = HashSet::new();
        for (idx, report) in self.reports.iter().enumerate() {
            validate_report(idx, report)?;
            if !names.insert(report.name.as_str()) {
                return Err(invalid(
                    &format!("reports[{idx}].name"),
                    format!("duplicate report name '{}'", report.name),
                ));
            }
        }

        Ok(())
    }

    /// 이름으로 리포트 명세를 찾습니다.
    pub fn report(&self, name: &str) -> Option<&ReportSpec> {
        self.reports.iter().find(|r| r.name == name)
    }
}

fn validate_report(idx: usize, report: &ReportSpec) -> Result<(), OvrgenError> {
    let field = |name: &str| format!("reports[{idx}].{name}");

    if report.name.is_empty() {
        return Err(invalid(&field("name"), "must not be empty"));
    }
    if report.name.contains(['/', '\\']) || report.name == "." || report.name == ".." {
        return Err(invalid(
            &field("name"),
            format!("'{}' must be usable as a file name", report.name),
        ));
    }

    if report.inputs.is_empty() {
        return Err(invalid(&field("input"), "at least one input report required"));
    }
    if report.inputs.iter().any(String::is_empty) {
        return Err(invalid(&field("input"), "input file name must not be empty"));
    }

    if report.format.as_deref().is_some_and(str::is_empty) {
        return Err(invalid(&field("format"), "must not be empty when set"));
    }

    if let Some(variants) = &report.variants {
        if variants.is_empty() {
            return Err(invalid(
                &field("reporttype"),
                "must contain at least one report type when set",
            ));
        }
        if variants.iter().any(String::is_empty) {
            return Err(invalid(&field("reporttype"), "report type must not be empty"));
        }
    }

    if report.level.as_deref().is_some_and(str::is_empty) {
        return Err(invalid(&field("level"), "must not be empty when set"));
    }

    Ok(())
}

fn invalid(field: &str, reason: impl Into<String>) -> OvrgenError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 작업 디렉토리 (주간 디렉토리, 피드 파일, 경로 필터의 기준)
    pub workdir: String,
}

impl GeneralConfig {
    /// 작업 디렉토리 경로
    pub fn workdir_path(&self) -> PathBuf {
        PathBuf::from(&self.workdir)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
            workdir: "/var/lib/ovrgen".to_owned(),
        }
    }
}

/// 외부 리포트 도구 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// 실행 파일 이름 또는 경로
    pub program: String,
    /// 실행 타임아웃 (초). 0이면 제한 없음
    pub timeout_secs: u64,
    /// 필터 임시 파일 디렉토리. 비어 있으면 시스템 임시 디렉토리
    pub scratch_dir: String,
}

impl ToolConfig {
    /// 필터 임시 파일 디렉토리 경로
    pub fn scratch_path(&self) -> PathBuf {
        if self.scratch_dir.is_empty() {
            std::env::temp_dir()
        } else {
            PathBuf::from(&self.scratch_dir)
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "openvasreporting".to_owned(),
            timeout_secs: 0,
            scratch_dir: String::new(),
        }
    }
}

/// 스캔 리포트 수집 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// `<task>-report.xml` 파일이 내보내지는 디렉토리
    pub source_dir: String,
    /// 수집 대상 태스크 이름
    pub tasks: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source_dir: "/var/lib/ovrgen/exports".to_owned(),
            tasks: Vec::new(),
        }
    }
}

/// 취약점 피드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// CISA Known Exploited Vulnerabilities JSON URL
    pub cisa_url: String,
    /// CISA 식별자 목록 파일 (작업 디렉토리 기준)
    pub cisa_file: String,
    /// MSRC CVRF 문서 URL 접두사 (`<year>-<Mon>`이 붙음)
    pub ms_url: String,
    /// Microsoft 식별자 목록 파일 (작업 디렉토리 기준)
    pub ms_file: String,
    /// HTTP 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cisa_url: "https://www.cisa.gov/sites/default/files/feeds/known_exploited_vulnerabilities.json".to_owned(),
            cisa_file: "cisa-kev.txt".to_owned(),
            ms_url: "https://api.msrc.microsoft.com/cvrf/v3.0/cvrf/".to_owned(),
            ms_file: "ms-patches.txt".to_owned(),
            request_timeout_secs: 60,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
