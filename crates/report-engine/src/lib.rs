#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 엔진 에러 (`ReportEngineError`)
//! - [`filter`]: 필터 구체화 (`FilterMaterializer`, `FilterSet`)
//! - [`invocation`]: 명령줄 조립 (`InvocationBuilder`, `Invocation`)
//! - [`runner`]: 외부 도구 실행 (`InvocationRunner`, `ProcessRunner`, `Outcome`)
//! - [`orchestrator`]: 명세 단위 실행 흐름 (`ReportOrchestrator`, `RunSummary`)
//! - [`collector`]: 스캔 리포트 수집 (`ReportCollector`, `DirectoryCollector`)

pub mod collector;
pub mod error;
pub mod filter;
pub mod invocation;
pub mod orchestrator;
pub mod runner;

// --- Public API Re-exports ---

// Orchestrator
pub use orchestrator::{
    ReportEvent, ReportOrchestrator, ReportSummary, RunSummary, VariantOutcome,
};

// Error
pub use error::ReportEngineError;

// Filters
pub use filter::{FilterMaterializer, FilterSet, MaterializedFilter};

// Invocation
pub use invocation::{Invocation, InvocationBuilder};
pub use runner::{InvocationRunner, Outcome, ProcessRunner, condense_stderr};

// Collection
pub use collector::{CollectSummary, DirectoryCollector, ReportCollector, report_file_name};
