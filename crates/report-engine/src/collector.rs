//! 스캔 리포트 수집
//!
//! 이미 내보낸 `<task>-report.xml` 파일을 주간 리포트 디렉토리로 복사합니다.
//! 스캐너와 직접 통신하는 수집기는 [`ReportCollector`]를 구현해 교체할 수 있습니다.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::error::ReportEngineError;

/// 작업 이름에서 리포트 파일 이름을 만듭니다.
pub fn report_file_name(task: &str) -> String {
    format!("{task}-report.xml")
}

/// 수집 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectSummary {
    /// 복사된 리포트 경로
    pub collected: Vec<PathBuf>,
    /// 원본이 없어 건너뛴 작업
    pub missing: Vec<String>,
}

impl CollectSummary {
    /// 누락된 작업이 있는지 여부
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// 스캔 리포트 수집기 trait
pub trait ReportCollector: Send + Sync {
    /// 작업별 리포트를 `report_dir`로 가져옵니다.
    ///
    /// 원본이 없는 작업은 에러가 아니라 `missing`에 기록됩니다.
    fn collect(
        &self,
        tasks: &[String],
        report_dir: &Path,
    ) -> impl Future<Output = Result<CollectSummary, ReportEngineError>> + Send;
}

/// 디렉토리 기반 수집기
#[derive(Debug, Clone)]
pub struct DirectoryCollector {
    source_dir: PathBuf,
}

impl DirectoryCollector {
    /// 원본 디렉토리로 생성합니다.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// 원본 디렉토리
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

impl ReportCollector for DirectoryCollector {
    async fn collect(
        &self,
        tasks: &[String],
        report_dir: &Path,
    ) -> Result<CollectSummary, ReportEngineError> {
        let mut summary = CollectSummary::default();

        for task in tasks {
            let file_name = report_file_name(task);
            let source = self.source_dir.join(&file_name);
            let target = report_dir.join(&file_name);

            // 원본 누락만 `missing`으로 기록합니다. 대상 쪽 실패는 에러입니다
            let exists = tokio::fs::try_exists(&source)
                .await
                .map_err(|e| ReportEngineError::Collect {
                    path: source.display().to_string(),
                    source: e,
                })?;
            if !exists {
                warn!(task = %task, source = %source.display(), "scan report not found, skipping");
                summary.missing.push(task.clone());
                continue;
            }

            let bytes = tokio::fs::copy(&source, &target)
                .await
                .map_err(|e| ReportEngineError::Collect {
                    path: target.display().to_string(),
                    source: e,
                })?;
            info!(task = %task, path = %target.display(), bytes, "scan report collected");
            summary.collected.push(target);
        }

        Ok(summary)
    }
}
