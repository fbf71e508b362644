//! Feed ingestion integration tests with a canned fetcher

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use ovrgen_core::config::FeedsConfig;
use ovrgen_feeds::{FeedFetcher, FeedIngestError, FeedIngester, FeedKind, FeedStatus};

const CISA_URL: &str = "https://feeds.test/kev.json";
const MS_URL: &str = "https://feeds.test/cvrf/";

/// Serves fixed bodies by URL and records requests.
#[derive(Default)]
struct CannedFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl CannedFetcher {
    fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_owned(), body.as_bytes().to_vec());
        self
    }

    fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

impl FeedFetcher for CannedFetcher {
    async fn fetch(&self, url: &str, accept: &str) -> Result<Vec<u8>, FeedIngestError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_owned(), accept.to_owned()));
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FeedIngestError::Status {
                url: url.to_owned(),
                status: 404,
            })
    }
}

fn config() -> FeedsConfig {
    FeedsConfig {
        cisa_url: CISA_URL.to_owned(),
        ms_url: MS_URL.to_owned(),
        ..FeedsConfig::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const KEV: &str = r#"{"vulnerabilities": [
    {"cveID": "CVE-2024-0010-x"},
    {"cveID": "CVE-2021-0002-x"},
    {"cveID": "garbage"},
    {"cveID": "CVE-2024-0009-x"},
    {"cveID": "CVE-2021-44228"}
]}"#;

const CVRF_MAR: &str = r#"{"Vulnerability": [
    {"CVE": "CVE-2024-0200-x"},
    {"CVE": "CVE-2024-0100-x"}
]}"#;

#[tokio::test]
async fn both_feeds_are_sorted_and_written() {
    let workdir = tempfile::tempdir().unwrap();
    let fetcher = CannedFetcher::default()
        .with(CISA_URL, KEV)
        .with(&format!("{MS_URL}2024-Mar"), CVRF_MAR);
    let ingester = FeedIngester::new(fetcher, config(), workdir.path());

    let summary = ingester.run(date(2024, 3, 20)).await;
    assert!(!summary.has_failures());
    assert_eq!(summary.feeds.len(), 2);
    assert_eq!(summary.feeds[0].feed, FeedKind::Cisa);
    assert_eq!(
        summary.feeds[0].status,
        FeedStatus::Written {
            entries: 5,
            malformed: 1
        }
    );

    // 형식 오류("garbage")와 레거시 3필드 식별자는 둘 다 센티넬 키로 입력 순서대로 앞에 온다.
    // 경고 카운트는 형식 오류만 센다.
    let cisa = std::fs::read_to_string(workdir.path().join("cisa-kev.txt")).unwrap();
    assert_eq!(
        cisa,
        "garbage\nCVE-2021-44228\nCVE-2021-0002-x\nCVE-2024-0009-x\nCVE-2024-0010-x"
    );

    let ms = std::fs::read_to_string(workdir.path().join("ms-patches.txt")).unwrap();
    assert_eq!(ms, "CVE-2024-0100-x\nCVE-2024-0200-x");
}

#[tokio::test]
async fn msrc_uses_previous_month_on_release_day() {
    let workdir = tempfile::tempdir().unwrap();
    let fetcher = CannedFetcher::default()
        .with(CISA_URL, KEV)
        .with(&format!("{MS_URL}2024-Feb"), CVRF_MAR);
    let ingester = FeedIngester::new(fetcher, config(), workdir.path());

    let outcome = ingester.run_feed(FeedKind::Msrc, date(2024, 3, 12)).await;
    assert!(outcome.is_success());

    let summary = ingester.run(date(2024, 3, 12)).await;
    assert!(!summary.has_failures());
}

#[tokio::test]
async fn one_failing_feed_does_not_stop_the_other() {
    let workdir = tempfile::tempdir().unwrap();
    // MSRC 문서가 없음 -> 404
    let fetcher = CannedFetcher::default().with(CISA_URL, KEV);
    let ingester = FeedIngester::new(fetcher, config(), workdir.path());

    let summary = ingester.run(date(2024, 3, 20)).await;
    assert!(summary.has_failures());
    assert!(summary.feeds[0].is_success());
    match &summary.feeds[1].status {
        FeedStatus::Failed { message } => assert!(message.contains("404")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(workdir.path().join("cisa-kev.txt").exists());
    assert!(!workdir.path().join("ms-patches.txt").exists());
}

#[tokio::test]
async fn unparsable_feed_keeps_previous_list() {
    let workdir = tempfile::tempdir().unwrap();
    let list = workdir.path().join("cisa-kev.txt");
    std::fs::write(&list, "CVE-2020-0001-x").unwrap();

    let fetcher = CannedFetcher::default().with(CISA_URL, "<html>maintenance</html>");
    let ingester = FeedIngester::new(fetcher, config(), workdir.path());

    let outcome = ingester.run_feed(FeedKind::Cisa, date(2024, 3, 20)).await;
    assert!(!outcome.is_success());
    assert_eq!(std::fs::read_to_string(&list).unwrap(), "CVE-2020-0001-x");
}

#[tokio::test]
async fn requests_are_made_in_feed_order() {
    let workdir = tempfile::tempdir().unwrap();
    let fetcher = CannedFetcher::default()
        .with(CISA_URL, KEV)
        .with(&format!("{MS_URL}2023-Dec"), CVRF_MAR);
    let ingester = FeedIngester::new(fetcher, config(), workdir.path());
    ingester.run(date(2024, 1, 2)).await;

    let fetcher = ingester.fetcher();
    assert_eq!(
        fetcher.requested_urls(),
        vec![CISA_URL.to_owned(), format!("{MS_URL}2023-Dec")]
    );
    assert!(
        fetcher
            .requests
            .lock()
            .unwrap()
            .iter()
            .all(|(_, accept)| accept == "application/json")
    );
}
