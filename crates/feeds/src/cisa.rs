//! CISA Known Exploited Vulnerabilities 카탈로그

use serde::Deserialize;

use crate::error::FeedIngestError;

#[derive(Debug, Deserialize)]
struct KevCatalog {
    vulnerabilities: Vec<KevEntry>,
}

#[derive(Debug, Deserialize)]
struct KevEntry {
    #[serde(rename = "cveID")]
    cve_id: String,
}

/// 카탈로그 JSON에서 CVE 식별자를 문서 순서대로 추출합니다.
///
/// # Errors
///
/// JSON이 아니거나 `vulnerabilities[].cveID`가 없으면 `FeedIngestError::Parse`.
pub fn parse_catalog(body: &[u8]) -> Result<Vec<String>, FeedIngestError> {
    let catalog: KevCatalog =
        serde_json::from_slice(body).map_err(|e| FeedIngestError::Parse {
            feed: "cisa".to_owned(),
            reason: e.to_string(),
        })?;
    Ok(catalog
        .vulnerabilities
        .into_iter()
        .map(|entry| entry.cve_id.trim().to_owned())
        .collect())
}
