//! 리포트 엔진 에러 타입
//!
//! [`ReportEngineError`]는 엔진 내부 에러를 나타냅니다.
//! `From<ReportEngineError> for OvrgenError` 구현으로 `?` 연산자를 통해
//! 상위 에러 타입으로 전파됩니다.
//!
//! 외부 도구의 실패는 에러가 아니라 [`Outcome::Failure`](crate::runner::Outcome) 값입니다.

use ovrgen_core::error::{OvrgenError, ReportError};

/// 리포트 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ReportEngineError {
    /// 필터 임시 파일 생성/쓰기 실패 (현재 리포트 명세에만 치명적)
    #[error("filter io error: {path}: {source}")]
    FilterIo {
        /// 임시 파일 또는 임시 디렉토리 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 스캔 리포트 복사 실패
    #[error("collect error: {path}: {source}")]
    Collect {
        /// 원본 리포트 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },
}

impl From<ReportEngineError> for OvrgenError {
    fn from(err: ReportEngineError) -> Self {
        match err {
            ReportEngineError::FilterIo { path, source } => {
                OvrgenError::Report(ReportError::FilterIo(format!("{path}: {source}")))
            }
            ReportEngineError::Collect { path, source } => {
                OvrgenError::Report(ReportError::Collect(format!("{path}: {source}")))
            }
        }
    }
}
