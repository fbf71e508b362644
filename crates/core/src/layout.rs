//! 주간 작업 디렉토리 레이아웃
//!
//! ```text
//! <workdir>/
//!   <year>-<month>/          # 월은 0-패딩하지 않음 (예: 2024-3)
//!     w<week>/               # week = day / 7 + 1
//!       reports/             # 수집된 스캔 리포트 (XML)
//!       <name>_by<V>.<fmt>   # 생성된 OVR
//! ```

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use crate::error::ReportError;

/// 특정 날짜의 주간 디렉토리 레이아웃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekLayout {
    week_dir: PathBuf,
    report_dir: PathBuf,
}

impl WeekLayout {
    /// 날짜에 해당하는 레이아웃을 계산합니다. 파일시스템은 건드리지 않습니다.
    pub fn for_date(workdir: impl AsRef<Path>, date: NaiveDate) -> Self {
        let week = date.day() / 7 + 1;
        let week_dir = workdir
            .as_ref()
            .join(format!("{}-{}", date.year(), date.month()))
            .join(format!("w{week}"));
        let report_dir = week_dir.join("reports");
        Self {
            week_dir,
            report_dir,
        }
    }

    /// 기존 디렉토리로 레이아웃을 구성합니다.
    pub fn from_dirs(week_dir: impl Into<PathBuf>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            week_dir: week_dir.into(),
            report_dir: report_dir.into(),
        }
    }

    /// 생성된 OVR이 저장되는 디렉토리
    pub fn week_dir(&self) -> &Path {
        &self.week_dir
    }

    /// 스캔 리포트(입력)가 저장되는 디렉토리
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// 디렉토리를 생성합니다 (이미 있으면 그대로 둡니다).
    pub fn ensure(&self) -> Result<(), ReportError> {
        std::fs::create_dir_all(&self.report_dir).map_err(|e| {
            ReportError::Workspace(format!("{}: {e}", self.report_dir.display()))
        })
    }
}
