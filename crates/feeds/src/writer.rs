//! 식별자 목록 정렬과 저장

use std::path::Path;

use tracing::warn;

use ovrgen_core::identifier::{sort_identifiers, try_canonical_key};

use crate::error::FeedIngestError;

/// 정렬된 식별자 목록
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalList {
    /// 정렬 키 순서의 식별자
    pub identifiers: Vec<String>,
    /// 형식이 잘못되어 센티넬 키를 받은 항목 수
    pub malformed: usize,
}

/// 식별자를 정렬 키 순서로 정렬합니다.
///
/// 형식이 잘못된 항목은 경고를 남기고 목록에 유지합니다 (맨 앞으로 정렬).
pub fn canonicalize(feed: &str, mut identifiers: Vec<String>) -> CanonicalList {
    let mut malformed = 0;
    for id in &identifiers {
        if let Err(e) = try_canonical_key(id) {
            warn!(feed, identifier = %id, error = %e, "malformed identifier");
            malformed += 1;
        }
    }
    sort_identifiers(&mut identifiers);
    CanonicalList {
        identifiers,
        malformed,
    }
}

/// 목록을 한 줄에 하나씩 저장합니다 (마지막 줄바꿈 없음).
pub async fn write_list(path: &Path, identifiers: &[String]) -> Result<(), FeedIngestError> {
    tokio::fs::write(path, identifiers.join("\n"))
        .await
        .map_err(|source| FeedIngestError::Write {
            path: path.display().to_string(),
            source,
        })
}
