//! 필터 구체화 -- 필터 명세를 도구가 읽을 수 있는 파일 경로로 변환
//!
//! - [`FilterSource::Path`]: 작업 디렉토리 기준 경로를 그대로 사용 (정리 책임 없음)
//! - [`FilterSource::Inline`]: 임시 디렉토리에 한 줄에 한 항목씩 쓴 새 파일 (정리 책임 있음)
//!
//! 임시 파일은 [`tempfile::TempPath`]가 소유하므로 [`FilterSet`]이 어떤 경로로
//! 해제되든 (정상 종료, 에러 반환, future 취소) 파일이 삭제됩니다.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use ovrgen_core::config::OvrgenConfig;
use ovrgen_core::report::{FilterCategory, FilterSide, FilterSource, ReportSpec};

use crate::error::ReportEngineError;

/// 임시 필터 파일 이름 접두사
const TEMP_PREFIX: &str = "ovrgen-";

/// 임시 필터 파일 확장자
const TEMP_SUFFIX: &str = ".filter";

/// 도구에 전달할 수 있는 형태로 구체화된 필터 한쪽(포함 또는 제외)
#[derive(Debug)]
pub enum MaterializedFilter {
    /// 기존 파일 경로 (삭제하지 않음)
    External(PathBuf),
    /// 새로 만든 임시 파일 (drop 시 삭제)
    Temporary(TempPath),
}

impl MaterializedFilter {
    /// 도구에 전달할 경로
    pub fn path(&self) -> &Path {
        match self {
            Self::External(path) => path.as_path(),
            Self::Temporary(temp) => temp,
        }
    }

    /// 정리 책임이 있는지 여부
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }
}

/// 필터 구체화기
#[derive(Debug, Clone)]
pub struct FilterMaterializer {
    /// 경로 필터의 기준 디렉토리
    base_dir: PathBuf,
    /// 임시 필터 파일 디렉토리
    scratch_dir: PathBuf,
}

impl FilterMaterializer {
    /// 기준 디렉토리와 임시 디렉토리로 생성합니다.
    pub fn new(base_dir: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    /// 설정에서 생성합니다 (`general.workdir`, `tool.scratch_dir`).
    pub fn from_config(config: &OvrgenConfig) -> Self {
        Self::new(config.general.workdir_path(), config.tool.scratch_path())
    }

    /// 필터 값 하나를 구체화합니다.
    ///
    /// # Errors
    ///
    /// 인라인 목록의 임시 파일을 만들거나 쓰지 못하면 `ReportEngineError::FilterIo`.
    /// 도중에 실패하면 이미 만든 임시 파일은 삭제됩니다.
    pub fn materialize(
        &self,
        source: &FilterSource,
    ) -> Result<MaterializedFilter, ReportEngineError> {
        match source {
            FilterSource::Path(relative) => {
                Ok(MaterializedFilter::External(self.base_dir.join(relative)))
            }
            FilterSource::Inline(values) => {
                self.write_temp(values).map(MaterializedFilter::Temporary)
            }
        }
    }

    fn write_temp(&self, values: &[String]) -> Result<TempPath, ReportEngineError> {
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.scratch_dir)
            .map_err(|source| ReportEngineError::FilterIo {
                path: self.scratch_dir.display().to_string(),
                source,
            })?;

        let io_err = |path: &Path, source| ReportEngineError::FilterIo {
            path: path.display().to_string(),
            source,
        };

        file.write_all(values.join("\n").as_bytes())
            .map_err(|e| io_err(file.path(), e))?;
        file.flush().map_err(|e| io_err(file.path(), e))?;

        // 파일 핸들을 닫고 경로만 유지한다
        let temp = file.into_temp_path();
        debug!(path = %temp.display(), entries = values.len(), "filter file written");
        Ok(temp)
    }
}

/// 한 리포트 명세의 구체화된 필터 모음
///
/// 명세 처리 동안 모든 임시 필터 파일을 소유합니다.
#[derive(Debug, Default)]
pub struct FilterSet {
    entries: Vec<(FilterCategory, FilterSide, MaterializedFilter)>,
}

impl FilterSet {
    /// 명세에 존재하는 모든 필터를 카테고리 순서, 포함-제외 순서로 구체화합니다.
    ///
    /// 하나라도 실패하면 그때까지 만든 임시 파일을 삭제하고 에러를 반환합니다.
    pub fn materialize(
        spec: &ReportSpec,
        materializer: &FilterMaterializer,
    ) -> Result<Self, ReportEngineError> {
        Self::materialize_with(spec, |source| materializer.materialize(source))
    }

    fn materialize_with<F>(spec: &ReportSpec, mut materialize: F) -> Result<Self, ReportEngineError>
    where
        F: FnMut(&FilterSource) -> Result<MaterializedFilter, ReportEngineError>,
    {
        let mut set = Self::default();
        for (category, filter) in spec.filters() {
            for side in FilterSide::ALL {
                if let Some(source) = filter.side(side) {
                    // `?`로 빠져나가면 `set`이 drop 되며 앞서 만든 임시 파일이 삭제된다
                    let materialized = materialize(source)?;
                    set.entries.push((category, side, materialized));
                }
            }
        }
        Ok(set)
    }

    /// 카테고리/방향의 필터 경로
    pub fn path(&self, category: FilterCategory, side: FilterSide) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(c, s, _)| *c == category && *s == side)
            .map(|(_, _, filter)| filter.path())
    }

    /// 정리 책임이 있는 임시 파일 경로
    pub fn temporary_paths(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|(_, _, filter)| filter.is_temporary())
            .map(|(_, _, filter)| filter.path().to_path_buf())
            .collect()
    }

    /// 구체화된 필터 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 필터가 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 모든 임시 파일을 삭제하고 삭제한 수를 반환합니다.
    ///
    /// 삭제 실패는 경고로만 남깁니다.
    pub fn cleanup(self) -> usize {
        let mut removed = 0;
        for (category, side, filter) in self.entries {
            if let MaterializedFilter::Temporary(temp) = filter {
                let path = temp.to_path_buf();
                match temp.close() {
                    Ok(()) => removed += 1,
                    Err(e) => warn!(
                        path = %path.display(),
                        category = %category,
                        side = ?side,
                        error = %e,
                        "failed to remove filter file"
                    ),
                }
            }
        }
        removed
    }
}
