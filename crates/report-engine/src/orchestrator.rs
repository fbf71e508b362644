//! 리포트 오케스트레이터 -- 리포트 명세 단위 실행 흐름 관리
//!
//! 명세 하나의 상태 전이:
//!
//! ```text
//! Init --> Materializing --> Invoking(variant) x N --> Cleanup --> Done
//!               |                                        ^
//!               +---- FilterIo 에러 (변형 실행 없음) ------+
//! ```
//!
//! 모든 실행은 순차적입니다. 다음 명세는 이전 명세의 임시 파일이 정리된 뒤에 시작하고,
//! 한 명세의 실패가 다른 명세나 다른 변형을 멈추지 않습니다.
//!
//! 결과는 [`ReportOrchestrator::run_with`]에 넘긴 콜백으로 변형이 끝날 때마다
//! [`ReportEvent`]로 전달되고, 실행이 끝나면 [`RunSummary`]로 다시 모아 반환됩니다.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use ovrgen_core::report::ReportSpec;

use crate::filter::{FilterMaterializer, FilterSet};
use crate::invocation::InvocationBuilder;
use crate::runner::{InvocationRunner, Outcome};

/// 변형 하나의 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantOutcome {
    /// 리포트 유형 태그
    pub variant: String,
    /// 실행 결과
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// 리포트 명세 하나의 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// 리포트 이름
    pub name: String,
    /// 변형별 결과 (설정 순서)
    pub outcomes: Vec<VariantOutcome>,
    /// 명세 수준 에러 (필터 구체화 실패 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportSummary {
    /// 명세 에러나 실패한 변형이 있는지 여부
    pub fn has_failures(&self) -> bool {
        self.error.is_some() || self.outcomes.iter().any(|o| !o.outcome.is_success())
    }

    /// 실행 중 전달된 것과 같은 순서의 이벤트
    pub fn events(&self) -> impl Iterator<Item = ReportEvent<'_>> {
        let failed = self.error.as_deref().map(|error| ReportEvent::Failed {
            report: &self.name,
            error,
        });
        let variants = self.outcomes.iter().map(|outcome| ReportEvent::Variant {
            report: &self.name,
            outcome,
        });
        failed.into_iter().chain(variants)
    }
}

/// 실행 진행 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportEvent<'a> {
    /// 변형 하나의 실행이 끝남
    Variant {
        report: &'a str,
        outcome: &'a VariantOutcome,
    },
    /// 명세를 처리할 수 없음 (변형 실행 없음)
    Failed { report: &'a str, error: &'a str },
}

/// 전체 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// 명세별 결과 (설정 순서)
    pub reports: Vec<ReportSummary>,
}

impl RunSummary {
    /// 성공한 변형 수
    pub fn succeeded(&self) -> usize {
        self.outcomes().filter(|o| o.is_success()).count()
    }

    /// 실패한 변형 수
    pub fn failed(&self) -> usize {
        self.outcomes().filter(|o| !o.is_success()).count()
    }

    /// 명세 에러 수
    pub fn errored(&self) -> usize {
        self.reports.iter().filter(|r| r.error.is_some()).count()
    }

    /// 하나라도 실패했는지 여부
    pub fn has_failures(&self) -> bool {
        self.reports.iter().any(ReportSummary::has_failures)
    }

    fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.reports
            .iter()
            .flat_map(|r| r.outcomes.iter().map(|o| &o.outcome))
    }
}

/// 리포트 오케스트레이터
///
/// 명세마다 필터를 구체화하고 변형별로 도구를 실행한 뒤 임시 파일을 정리합니다.
pub struct ReportOrchestrator<R> {
    runner: R,
    builder: InvocationBuilder,
    materializer: FilterMaterializer,
}

impl<R: InvocationRunner> ReportOrchestrator<R> {
    /// 실행기, 명령줄 조립기, 필터 구체화기로 생성합니다.
    pub fn new(runner: R, builder: InvocationBuilder, materializer: FilterMaterializer) -> Self {
        Self {
            runner,
            builder,
            materializer,
        }
    }

    /// 실행기 참조
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// 모든 명세를 설정 순서대로 실행합니다.
    pub async fn run(&self, specs: &[ReportSpec]) -> RunSummary {
        self.run_with(specs, |_| {}).await
    }

    /// 모든 명세를 실행하며 변형이 끝날 때마다 `on_event`를 호출합니다.
    pub async fn run_with<F>(&self, specs: &[ReportSpec], mut on_event: F) -> RunSummary
    where
        F: FnMut(ReportEvent<'_>),
    {
        let mut summary = RunSummary::default();
        for spec in specs {
            summary
                .reports
                .push(self.run_report_with(spec, &mut on_event).await);
        }

        info!(
            reports = summary.reports.len(),
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            errored = summary.errored(),
            "report stage finished"
        );
        summary
    }

    /// 명세 하나를 실행합니다.
    ///
    /// 반환 시점에는 이 명세의 임시 필터 파일이 모두 삭제되어 있습니다.
    /// 실행 중 future가 취소되어도 [`FilterSet`]의 drop으로 삭제됩니다.
    pub async fn run_report(&self, spec: &ReportSpec) -> ReportSummary {
        self.run_report_with(spec, &mut |_: ReportEvent<'_>| {}).await
    }

    async fn run_report_with<F>(&self, spec: &ReportSpec, on_event: &mut F) -> ReportSummary
    where
        F: FnMut(ReportEvent<'_>),
    {
        let variants = spec.effective_variants();
        debug!(
            report = %spec.name,
            format = spec.effective_format(),
            variants = ?variants,
            "processing report"
        );

        let filters = match FilterSet::materialize(spec, &self.materializer) {
            Ok(filters) => filters,
            Err(e) => {
                error!(report = %spec.name, error = %e, "failed to materialize filters");
                let error = e.to_string();
                on_event(ReportEvent::Failed {
                    report: &spec.name,
                    error: &error,
                });
                return ReportSummary {
                    name: spec.name.clone(),
                    outcomes: Vec::new(),
                    error: Some(error),
                };
            }
        };

        let mut outcomes = Vec::with_capacity(variants.len());
        for variant in variants {
            let invocation = self.builder.build(spec, &variant, &filters);
            let outcome = self.runner.run(&invocation).await;

            match &outcome {
                Outcome::Success { output_path } => {
                    info!(report = %spec.name, variant = %variant, path = %output_path.display(), "OVR created");
                }
                Outcome::Failure {
                    output_path,
                    message,
                } => {
                    warn!(
                        report = %spec.name,
                        variant = %variant,
                        path = %output_path.display(),
                        message = %message,
                        "OVR generation failed"
                    );
                }
            }

            let result = VariantOutcome { variant, outcome };
            on_event(ReportEvent::Variant {
                report: &spec.name,
                outcome: &result,
            });
            outcomes.push(result);
        }

        let removed = filters.cleanup();
        debug!(report = %spec.name, removed, "filter files removed");

        ReportSummary {
            name: spec.name.clone(),
            outcomes,
            error: None,
        }
    }
}
