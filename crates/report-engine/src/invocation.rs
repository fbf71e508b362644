//! 외부 리포트 도구 명령줄 조립
//!
//! 인자 순서:
//!
//! ```text
//! <program>
//!   -i <report_dir>/<input>       (입력마다 반복)
//!   -f <format>
//!   -n/-N, -e/-E, -r/-R <path>    (network, cve, regex 순서, 포함 후 제외)
//!   -l <level>                    (설정된 경우)
//!   -T <variant>
//!   -o <week_dir>/<name>_by<VARIANT>.<format>
//! ```
//!
//! 같은 입력에서는 항상 같은 인자와 출력 경로가 나오므로 재실행하면 기존 파일을 덮어씁니다.

use std::fmt;
use std::path::{Path, PathBuf};

use ovrgen_core::layout::WeekLayout;
use ovrgen_core::report::{FilterCategory, FilterSide, ReportSpec};

use crate::filter::FilterSet;

/// 외부 도구 한 번의 실행 명세 (생성 후 변경되지 않음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    output_path: PathBuf,
}

impl Invocation {
    /// 실행 파일
    pub fn program(&self) -> &str {
        &self.program
    }

    /// 프로그램 이름을 제외한 인자
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// 프로그램 이름을 포함한 전체 명령줄
    pub fn command_line(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// 생성될 리포트 경로
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line().join(" "))
    }
}

/// 명령줄 조립기
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    program: String,
    report_dir: PathBuf,
    output_dir: PathBuf,
}

impl InvocationBuilder {
    /// 프로그램과 입력/출력 디렉토리로 생성합니다.
    pub fn new(
        program: impl Into<String>,
        report_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            report_dir: report_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// 주간 레이아웃에서 생성합니다.
    pub fn for_layout(program: impl Into<String>, layout: &WeekLayout) -> Self {
        Self::new(program, layout.report_dir(), layout.week_dir())
    }

    /// 리포트 유형 하나에 대한 출력 경로
    pub fn output_path(&self, spec: &ReportSpec, variant: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}_by{}.{}",
            spec.name,
            variant.to_uppercase(),
            spec.effective_format()
        ))
    }

    /// 명세와 리포트 유형, 구체화된 필터로 실행 명세를 조립합니다.
    pub fn build(&self, spec: &ReportSpec, variant: &str, filters: &FilterSet) -> Invocation {
        let format = spec.effective_format();
        let mut args = Vec::new();

        for input in &spec.inputs {
            args.push("-i".to_owned());
            args.push(path_arg(&self.report_dir.join(input)));
        }

        args.push("-f".to_owned());
        args.push(format.to_owned());

        for category in FilterCategory::ALL {
            for side in FilterSide::ALL {
                if let Some(path) = filters.path(category, side) {
                    args.push(filter_flag(category, side));
                    args.push(path_arg(path));
                }
            }
        }

        if let Some(level) = &spec.level {
            args.push("-l".to_owned());
            args.push(level.clone());
        }

        args.push("-T".to_owned());
        args.push(variant.to_owned());

        let output_path = self.output_path(spec, variant);
        args.push("-o".to_owned());
        args.push(path_arg(&output_path));

        Invocation {
            program: self.program.clone(),
            args,
            output_path,
        }
    }
}

/// 포함 필터는 소문자, 제외 필터는 대문자 플래그
fn filter_flag(category: FilterCategory, side: FilterSide) -> String {
    let flag = category.flag_char();
    match side {
        FilterSide::Include => format!("-{flag}"),
        FilterSide::Exclude => format!("-{}", flag.to_ascii_uppercase()),
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
