//! 리포트 명세 -- `[[reports]]` 테이블의 데이터 모델
//!
//! [`ReportSpec`]은 외부 리포트 도구를 몇 번, 어떤 필터로 실행할지 선언합니다.
//! 필터 값의 형태(인라인 목록 / 파일 경로)는 설정 로딩 시점에
//! [`FilterSource`]로 한 번만 결정됩니다.
//!
//! ```toml
//! [[reports]]
//! name = "servers"
//! input = ["servers-report.xml"]
//! reporttype = ["v", "h"]
//! level = "high"
//!
//! [reports.network]
//! includes = ["10.0.0.0/8"]
//! excludes = "filters/excluded-hosts.txt"
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// `format` 미지정 시 기본 출력 형식
pub const DEFAULT_FORMAT: &str = "xlsx";

/// `reporttype` 미지정 시 기본 리포트 유형
pub const DEFAULT_VARIANT: &str = "v";

/// 하나의 논리 리포트 명세
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSpec {
    /// 리포트 이름 (고유 키, 출력 파일명에 사용)
    pub name: String,
    /// 입력 스캔 리포트 파일명 목록 (리포트 디렉토리 기준)
    #[serde(rename = "input")]
    pub inputs: Vec<String>,
    /// 출력 형식
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// 리포트 유형 태그 목록
    #[serde(
        default,
        rename = "reporttype",
        skip_serializing_if = "Option::is_none"
    )]
    pub variants: Option<Vec<String>>,
    /// 심각도 필터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// 네트워크 필터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<FilterSpec>,
    /// CVE 필터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve: Option<FilterSpec>,
    /// 정규식 필터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<FilterSpec>,
}

impl ReportSpec {
    /// 기본값이 적용된 출력 형식
    pub fn effective_format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    /// 기본값이 적용된 리포트 유형 목록
    pub fn effective_variants(&self) -> Vec<String> {
        match &self.variants {
            Some(variants) => variants.clone(),
            None => vec![DEFAULT_VARIANT.to_owned()],
        }
    }

    /// 카테고리의 필터 명세
    pub fn filter(&self, category: FilterCategory) -> Option<&FilterSpec> {
        match category {
            FilterCategory::Network => self.network.as_ref(),
            FilterCategory::Cve => self.cve.as_ref(),
            FilterCategory::Regex => self.regex.as_ref(),
        }
    }

    /// 존재하는 필터를 카테고리 순서대로 반환합니다.
    pub fn filters(&self) -> impl Iterator<Item = (FilterCategory, &FilterSpec)> {
        FilterCategory::ALL
            .into_iter()
            .filter_map(|category| self.filter(category).map(|spec| (category, spec)))
    }

    /// includes/excludes가 모두 없는 필터 카테고리를 제거합니다.
    pub(crate) fn normalize(&mut self) {
        for slot in [&mut self.network, &mut self.cve, &mut self.regex] {
            if slot.as_ref().is_some_and(FilterSpec::is_empty) {
                *slot = None;
            }
        }
    }
}

/// 필터 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    /// 호스트/네트워크
    Network,
    /// CVE 식별자
    Cve,
    /// 정규식
    Regex,
}

impl FilterCategory {
    /// 명령줄 인자 순서와 동일한 카테고리 순서
    pub const ALL: [FilterCategory; 3] = [Self::Network, Self::Cve, Self::Regex];

    /// 포함 필터 플래그 문자 (제외 필터는 대문자)
    pub fn flag_char(self) -> char {
        match self {
            Self::Network => 'n',
            Self::Cve => 'e',
            Self::Regex => 'r',
        }
    }

    /// 설정 키 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Cve => "cve",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 필터의 포함/제외 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSide {
    /// 포함
    Include,
    /// 제외
    Exclude,
}

impl FilterSide {
    /// 명령줄 인자 순서와 동일한 방향 순서
    pub const ALL: [FilterSide; 2] = [Self::Include, Self::Exclude];
}

/// 한 카테고리의 필터 명세
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// 포함 목록
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<FilterSource>,
    /// 제외 목록
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excludes: Option<FilterSource>,
}

impl FilterSpec {
    /// 방향별 필터 값
    pub fn side(&self, side: FilterSide) -> Option<&FilterSource> {
        match side {
            FilterSide::Include => self.includes.as_ref(),
            FilterSide::Exclude => self.excludes.as_ref(),
        }
    }

    /// includes/excludes가 모두 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.includes.is_none() && self.excludes.is_none()
    }
}

/// 필터 값의 형태
///
/// TOML 배열은 `Inline`, 문자열은 `Path`로 역직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSource {
    /// 설정에 직접 적힌 항목 목록
    Inline(Vec<String>),
    /// 작업 디렉토리 기준의 기존 파일 경로
    Path(String),
}
