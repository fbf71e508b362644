//! ovrgen.toml 통합 설정 테스트
//!
//! - ovrgen.toml.example 파싱 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use ovrgen_core::config::OvrgenConfig;
use ovrgen_core::error::{ConfigError, OvrgenError};
use ovrgen_core::report::{FilterSource, FilterSpec};

// =============================================================================
// ovrgen.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../ovrgen.toml.example");
    let config = OvrgenConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.workdir, "/var/lib/ovrgen");
    assert_eq!(config.tool.program, "openvasreporting");
    assert_eq!(config.collector.tasks, vec!["servers", "workstations"]);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../ovrgen.toml.example");
    let config = OvrgenConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_reports_resolve_filter_shapes() {
    let content = include_str!("../../../ovrgen.toml.example");
    let config = OvrgenConfig::parse(content).expect("should parse");

    assert_eq!(config.reports.len(), 2);

    let servers = &config.reports[0];
    assert_eq!(servers.name, "servers");
    assert_eq!(servers.effective_format(), "xlsx");
    assert_eq!(servers.effective_variants(), vec!["v", "h"]);
    assert_eq!(servers.level.as_deref(), Some("high"));
    assert_eq!(
        servers.network,
        Some(FilterSpec {
            includes: None,
            excludes: Some(FilterSource::Inline(vec![
                "10.0.0.5".to_owned(),
                "10.0.0.6".to_owned()
            ])),
        })
    );
    assert_eq!(
        servers.cve.as_ref().and_then(|f| f.includes.clone()),
        Some(FilterSource::Path("cisa-kev.txt".to_owned()))
    );

    let workstations = &config.reports[1];
    assert_eq!(workstations.effective_format(), "csv");
    assert_eq!(workstations.effective_variants(), vec!["v"]);
    assert!(workstations.network.is_none());
    assert!(workstations.regex.is_some());
}

// =============================================================================
// 환경변수 오버라이드 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_overrides_take_precedence_over_file() {
    let content = include_str!("../../../ovrgen.toml.example");
    let mut config = OvrgenConfig::parse(content).expect("should parse");

    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe {
        std::env::set_var("OVRGEN_TOOL_PROGRAM", "/opt/bin/openvasreporting");
        std::env::set_var("OVRGEN_TOOL_TIMEOUT_SECS", "600");
        std::env::set_var("OVRGEN_COLLECTOR_TASKS", "dmz");
    }
    config.apply_env_overrides();
    unsafe {
        std::env::remove_var("OVRGEN_TOOL_PROGRAM");
        std::env::remove_var("OVRGEN_TOOL_TIMEOUT_SECS");
        std::env::remove_var("OVRGEN_COLLECTOR_TASKS");
    }

    assert_eq!(config.tool.program, "/opt/bin/openvasreporting");
    assert_eq!(config.tool.timeout_secs, 600);
    assert_eq!(config.collector.tasks, vec!["dmz"]);
}

#[tokio::test]
#[serial_test::serial]
async fn load_applies_env_then_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ovrgen.toml");
    std::fs::write(&path, "[general]\nlog_level = \"debug\"\n").unwrap();

    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("OVRGEN_GENERAL_LOG_LEVEL", "loud") };
    let result = OvrgenConfig::load(&path).await;
    unsafe { std::env::remove_var("OVRGEN_GENERAL_LOG_LEVEL") };

    let err = result.expect_err("invalid override should fail validation");
    assert!(err.to_string().contains("general.log_level"));
}

#[tokio::test]
#[serial_test::serial]
async fn env_override_can_repair_file_that_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ovrgen.toml");
    std::fs::write(&path, "[feeds]\nenabled = true\ncisa_url = \"\"\n").unwrap();

    // 파일만으로는 검증에 실패합니다
    let from_file = OvrgenConfig::from_file(&path).await.expect("parses");
    assert!(from_file.validate().is_err());

    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("OVRGEN_FEEDS_ENABLED", "false") };
    let result = OvrgenConfig::load(&path).await;
    unsafe { std::env::remove_var("OVRGEN_FEEDS_ENABLED") };

    let config = result.expect("feeds disabled by env, so empty url is fine");
    assert!(!config.feeds.enabled);
    assert!(config.feeds.cisa_url.is_empty());
}

// =============================================================================
// 에러 케이스
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn empty_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();

    let config = OvrgenConfig::load(&path).await.expect("empty config is valid");
    assert!(config.reports.is_empty());
    assert_eq!(config.tool.program, "openvasreporting");
}

#[test]
fn unknown_filter_shape_is_parse_error() {
    let toml = r#"
[[reports]]
name = "servers"
input = ["servers-report.xml"]

[reports.network]
includes = 42
"#;
    let err = OvrgenConfig::parse(toml).unwrap_err();
    assert!(matches!(
        err,
        OvrgenError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn duplicate_names_fail_validation_before_anything_runs() {
    let toml = r#"
[[reports]]
name = "servers"
input = ["a.xml"]

[[reports]]
name = "servers"
input = ["b.xml"]
"#;
    let config = OvrgenConfig::parse(toml).expect("syntactically valid");
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        OvrgenError::Config(ConfigError::InvalidValue { .. })
    ));
}
