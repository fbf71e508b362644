#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod identifier;
pub mod layout;
pub mod report;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, FeedError, IdentifierError, OvrgenError, ReportError};

// 설정
pub use config::OvrgenConfig;

// 리포트 명세
pub use report::{FilterCategory, FilterSide, FilterSource, FilterSpec, ReportSpec};

// 식별자 정렬
pub use identifier::{SENTINEL_KEY, canonical_key, sort_identifiers, try_canonical_key};

// 디렉토리 레이아웃
pub use layout::WeekLayout;
