//! 피드 다운로드
//!
//! [`FeedFetcher`] trait으로 네트워크 접근을 추상화합니다.
//! 테스트에서는 고정된 응답을 돌려주는 구현으로 교체합니다.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::error::FeedIngestError;

/// JSON 응답 요청용 Accept 값
pub const ACCEPT_JSON: &str = "application/json";

/// 요청 User-Agent
const USER_AGENT: &str = concat!("ovrgen/", env!("CARGO_PKG_VERSION"));

/// 피드 문서를 가져오는 trait
pub trait FeedFetcher: Send + Sync {
    /// URL의 응답 본문을 가져옵니다.
    fn fetch(
        &self,
        url: &str,
        accept: &str,
    ) -> impl Future<Output = Result<Vec<u8>, FeedIngestError>> + Send;
}

/// reqwest 기반 HTTP 다운로더
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// 요청 타임아웃을 적용한 다운로더를 생성합니다.
    ///
    /// # Errors
    ///
    /// TLS 백엔드 초기화 등으로 클라이언트를 만들 수 없으면 `FeedIngestError::Client`.
    pub fn new(timeout: Duration) -> Result<Self, FeedIngestError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedIngestError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, accept: &str) -> Result<Vec<u8>, FeedIngestError> {
        let fetch_err = |e: reqwest::Error| FeedIngestError::Fetch {
            url: url.to_owned(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(fetch_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedIngestError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(fetch_err)?;
        debug!(url, bytes = body.len(), "feed downloaded");
        Ok(body.to_vec())
    }
}
