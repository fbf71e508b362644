//! 피드 수집 흐름 -- 다운로드, 파싱, 정렬, 저장
//!
//! ```text
//! FeedFetcher --> cisa::parse_catalog  --+
//!             --> msrc::parse_document --+--> canonicalize --> write_list
//! ```
//!
//! 피드는 CISA, MSRC 순서로 하나씩 처리하며 한 피드의 실패가 다른 피드를 멈추지 않습니다.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use ovrgen_core::config::FeedsConfig;

use crate::error::FeedIngestError;
use crate::fetch::{ACCEPT_JSON, FeedFetcher};
use crate::writer::{canonicalize, write_list};
use crate::{cisa, msrc};

/// 피드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// CISA Known Exploited Vulnerabilities
    Cisa,
    /// Microsoft 월간 보안 업데이트
    Msrc,
}

impl FeedKind {
    /// 처리 순서
    pub const ALL: [FeedKind; 2] = [Self::Cisa, Self::Msrc];

    /// 피드 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cisa => "cisa",
            Self::Msrc => "msrc",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 피드 처리 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FeedStatus {
    /// 목록 저장 완료
    Written {
        /// 저장된 식별자 수
        entries: usize,
        /// 형식이 잘못된 식별자 수
        malformed: usize,
    },
    /// 처리 실패
    Failed {
        /// 실패 사유
        message: String,
    },
}

/// 피드 하나의 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedOutcome {
    /// 피드 종류
    pub feed: FeedKind,
    /// 목록 파일 경로
    pub path: PathBuf,
    /// 처리 결과
    #[serde(flatten)]
    pub status: FeedStatus,
}

impl FeedOutcome {
    /// 성공 여부
    pub fn is_success(&self) -> bool {
        matches!(self.status, FeedStatus::Written { .. })
    }

    /// 사용자에게 보여줄 상태 줄
    pub fn status_line(&self) -> String {
        match &self.status {
            FeedStatus::Written { entries, .. } => format!(
                "{} list {} updated ({entries} identifiers).",
                self.feed,
                self.path.display()
            ),
            FeedStatus::Failed { message } => format!(
                "Error updating {} list {}: {message}",
                self.feed,
                self.path.display()
            ),
        }
    }
}

/// 전체 피드 처리 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    /// 피드별 결과 (처리 순서)
    pub feeds: Vec<FeedOutcome>,
}

impl FeedSummary {
    /// 실패한 피드가 있는지 여부
    pub fn has_failures(&self) -> bool {
        self.feeds.iter().any(|f| !f.is_success())
    }
}

/// 피드 수집기
pub struct FeedIngester<F> {
    fetcher: F,
    config: FeedsConfig,
    workdir: PathBuf,
}

impl<F: FeedFetcher> FeedIngester<F> {
    /// 다운로더, 피드 설정, 작업 디렉토리로 생성합니다.
    pub fn new(fetcher: F, config: FeedsConfig, workdir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            config,
            workdir: workdir.into(),
        }
    }

    /// 다운로더 참조
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// 피드 목록 파일 경로
    pub fn list_path(&self, feed: FeedKind) -> PathBuf {
        match feed {
            FeedKind::Cisa => self.workdir.join(&self.config.cisa_file),
            FeedKind::Msrc => self.workdir.join(&self.config.ms_file),
        }
    }

    /// 모든 피드를 순서대로 처리합니다. `today`는 MSRC 문서 월 선택에 사용됩니다.
    pub async fn run(&self, today: NaiveDate) -> FeedSummary {
        let mut summary = FeedSummary::default();
        for feed in FeedKind::ALL {
            summary.feeds.push(self.run_feed(feed, today).await);
        }
        summary
    }

    /// 피드 하나를 처리합니다. 에러는 결과 값으로 변환됩니다.
    pub async fn run_feed(&self, feed: FeedKind, today: NaiveDate) -> FeedOutcome {
        let path = self.list_path(feed);
        let status = match self.ingest(feed, today, &path).await {
            Ok((entries, malformed)) => {
                info!(feed = %feed, path = %path.display(), entries, malformed, "feed list written");
                FeedStatus::Written { entries, malformed }
            }
            Err(e) => {
                warn!(feed = %feed, error = %e, "feed ingestion failed");
                FeedStatus::Failed {
                    message: e.to_string(),
                }
            }
        };
        FeedOutcome { feed, path, status }
    }

    async fn ingest(
        &self,
        feed: FeedKind,
        today: NaiveDate,
        path: &std::path::Path,
    ) -> Result<(usize, usize), FeedIngestError> {
        let identifiers = match feed {
            FeedKind::Cisa => {
                let body = self.fetcher.fetch(&self.config.cisa_url, ACCEPT_JSON).await?;
                cisa::parse_catalog(&body)?
            }
            FeedKind::Msrc => {
                let url = msrc::document_url(&self.config.ms_url, today);
                let body = self.fetcher.fetch(&url, ACCEPT_JSON).await?;
                msrc::parse_document(&body)?
            }
        };

        let list = canonicalize(feed.as_str(), identifiers);
        write_list(path, &list.identifiers).await?;
        Ok((list.identifiers.len(), list.malformed))
    }
}
