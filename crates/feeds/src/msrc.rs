//! Microsoft 월간 보안 업데이트 (MSRC CVRF)
//!
//! 월간 업데이트는 매월 둘째 화요일에 공개됩니다. 오늘이 둘째 화요일 이후라면
//! 이번 달 문서를, 그렇지 않으면 (둘째 화요일 당일 포함) 지난달 문서를 사용합니다.
//!
//! 문서 ID는 `<year>-<Mon>` 형식입니다 (예: `2024-Mar`).

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use crate::error::FeedIngestError;

#[derive(Debug, Deserialize)]
struct CvrfDocument {
    #[serde(rename = "Vulnerability", default)]
    vulnerabilities: Vec<CvrfVulnerability>,
}

#[derive(Debug, Deserialize)]
struct CvrfVulnerability {
    #[serde(rename = "CVE", default)]
    cve: Option<String>,
}

/// 해당 월의 둘째 화요일 (일)
pub fn second_tuesday(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Tue, 2).map(|d| d.day())
}

/// 사용할 업데이트 문서의 월 (1일 날짜로 반환)
pub fn update_month(today: NaiveDate) -> NaiveDate {
    let first = today.with_day(1).unwrap_or(today);
    let released = second_tuesday(today.year(), today.month())
        .is_some_and(|day| day < today.day());

    if released {
        first
    } else {
        first
            .pred_opt()
            .and_then(|last| last.with_day(1))
            .unwrap_or(first)
    }
}

/// 업데이트 문서 ID (`2024-Mar`)
pub fn update_id(today: NaiveDate) -> String {
    update_month(today).format("%Y-%b").to_string()
}

/// 기본 URL 뒤에 문서 ID를 붙입니다.
pub fn document_url(base_url: &str, today: NaiveDate) -> String {
    format!("{base_url}{}", update_id(today))
}

/// CVRF JSON 문서에서 CVE 식별자를 문서 순서대로 추출합니다.
///
/// CVE가 없는 항목(권고문 등)은 건너뜁니다.
pub fn parse_document(body: &[u8]) -> Result<Vec<String>, FeedIngestError> {
    let document: CvrfDocument =
        serde_json::from_slice(body).map_err(|e| FeedIngestError::Parse {
            feed: "msrc".to_owned(),
            reason: e.to_string(),
        })?;
    Ok(document
        .vulnerabilities
        .into_iter()
        .filter_map(|v| v.cve)
        .map(|cve| cve.trim().to_owned())
        .filter(|cve| !cve.is_empty())
        .collect())
}
