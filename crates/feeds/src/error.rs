//! 피드 수집 에러 타입
//!
//! [`FeedIngestError`]는 `From<FeedIngestError> for OvrgenError` 구현으로
//! 상위 에러 타입으로 전파됩니다.

use ovrgen_core::error::{FeedError, OvrgenError};

/// 피드 수집 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum FeedIngestError {
    /// 요청 전송 또는 응답 수신 실패
    #[error("request to {url} failed: {reason}")]
    Fetch {
        /// 요청 URL
        url: String,
        /// 실패 사유
        reason: String,
    },

    /// 성공이 아닌 HTTP 상태 코드
    #[error("request to {url} returned status {status}")]
    Status {
        /// 요청 URL
        url: String,
        /// HTTP 상태 코드
        status: u16,
    },

    /// 피드 문서 파싱 실패
    #[error("failed to parse {feed} document: {reason}")]
    Parse {
        /// 피드 이름
        feed: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 목록 파일 쓰기 실패
    #[error("failed to write {path}: {source}")]
    Write {
        /// 목록 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// HTTP 클라이언트 생성 실패
    #[error("http client error: {0}")]
    Client(String),
}

impl From<FeedIngestError> for OvrgenError {
    fn from(err: FeedIngestError) -> Self {
        let feed_err = match err {
            FeedIngestError::Fetch { .. }
            | FeedIngestError::Status { .. }
            | FeedIngestError::Client(_) => FeedError::Fetch(err.to_string()),
            FeedIngestError::Parse { .. } => FeedError::Parse(err.to_string()),
            FeedIngestError::Write { .. } => FeedError::Write(err.to_string()),
        };
        OvrgenError::Feed(feed_err)
    }
}
