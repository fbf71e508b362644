//! 에러 타입 -- 도메인별 에러 정의

/// ovrgen 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum OvrgenError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 리포트 생성 엔진 에러
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// 취약점 피드 수집 에러
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
///
/// 리포트 실행 전에 발생하며, 발생 시 전체 실행을 중단합니다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 리포트 생성 에러
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// 필터 임시 파일 생성/쓰기 실패
    #[error("filter io failed: {0}")]
    FilterIo(String),

    /// 작업 디렉토리 준비 실패
    #[error("workspace error: {0}")]
    Workspace(String),

    /// 스캔 리포트 수집 실패
    #[error("collect failed: {0}")]
    Collect(String),
}

/// 피드 수집 에러
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// 피드 다운로드 실패
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// 피드 문서 파싱 실패
    #[error("parse failed: {0}")]
    Parse(String),

    /// 식별자 목록 저장 실패
    #[error("write failed: {0}")]
    Write(String),
}

/// 취약점 식별자 파싱 실패
///
/// 피드 수집을 중단시키지 않습니다. 해당 항목은 센티넬 키를 받습니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// `-` 로 나눈 필드 수가 3 또는 4가 아님
    #[error("unexpected field count {count} in '{identifier}'")]
    FieldCount { identifier: String, count: usize },

    /// 연도 필드가 4자리 숫자가 아님
    #[error("invalid year '{year}' in '{identifier}'")]
    Year { identifier: String, year: String },

    /// 번호 필드가 1-10자리 숫자가 아님
    #[error("invalid sequence number '{number}' in '{identifier}'")]
    Number { identifier: String, number: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: OvrgenError = ConfigError::InvalidValue {
            field: "reports[0].name".to_owned(),
            reason: "must not be empty".to_owned(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.starts_with("config error"));
        assert!(msg.contains("reports[0].name"));
    }

    #[test]
    fn identifier_error_display() {
        let err = IdentifierError::Number {
            identifier: "CVE-2021-12ab-x".to_owned(),
            number: "12ab".to_owned(),
        };
        assert!(err.to_string().contains("12ab"));
        assert!(err.to_string().contains("CVE-2021-12ab-x"));
    }

    #[test]
    fn filter_io_display() {
        let err = OvrgenError::from(ReportError::FilterIo("disk full".to_owned()));
        assert_eq!(err.to_string(), "report error: filter io failed: disk full");
    }
}
