#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 피드 에러 (`FeedIngestError`)
//! - [`fetch`]: 다운로드 (`FeedFetcher`, `HttpFetcher`)
//! - [`cisa`]: CISA KEV 카탈로그 파싱
//! - [`msrc`]: MSRC 월 선택, CVRF 문서 파싱
//! - [`writer`]: 정렬과 저장
//! - [`ingest`]: 전체 흐름 (`FeedIngester`, `FeedSummary`)

pub mod cisa;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod msrc;
pub mod writer;

pub use error::FeedIngestError;
pub use fetch::{FeedFetcher, HttpFetcher};
pub use ingest::{FeedIngester, FeedKind, FeedOutcome, FeedStatus, FeedSummary};
pub use writer::{CanonicalList, canonicalize, write_list};
