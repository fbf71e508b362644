//! 외부 도구 실행과 결과 분류
//!
//! [`ProcessRunner`]는 도구를 자식 프로세스로 실행하고 종료를 기다립니다.
//! 표준 출력/에러는 그대로 흘려보내지 않고 캡처합니다.
//!
//! | 결과 | Outcome |
//! |------|---------|
//! | 종료 코드 0 | `Success` |
//! | 종료 코드 != 0 | `Failure` (stderr의 마지막 비어 있지 않은 줄) |
//! | 실행 불가 (없음, 권한) | `Failure` |
//! | 타임아웃 | `Failure` (자식 프로세스 종료) |

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

use crate::invocation::Invocation;

/// 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// 리포트 생성 성공
    Success {
        /// 생성된 리포트 경로
        output_path: PathBuf,
    },
    /// 리포트 생성 실패
    Failure {
        /// 생성하려던 리포트 경로
        output_path: PathBuf,
        /// 요약된 실패 사유
        message: String,
    },
}

impl Outcome {
    /// 성공 여부
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// 리포트 경로
    pub fn output_path(&self) -> &Path {
        match self {
            Self::Success { output_path } | Self::Failure { output_path, .. } => output_path,
        }
    }

    /// 사용자에게 보여줄 상태 줄
    pub fn status_line(&self) -> String {
        match self {
            Self::Success { output_path } => {
                format!("OVR {} created.", output_path.display())
            }
            Self::Failure {
                output_path,
                message,
            } => format!("Error generating OVR {}: {message}", output_path.display()),
        }
    }

    fn failure(invocation: &Invocation, message: impl Into<String>) -> Self {
        Self::Failure {
            output_path: invocation.output_path().to_path_buf(),
            message: message.into(),
        }
    }
}

/// 실행 명세를 실행하는 trait
///
/// 어떤 실패도 이 경계를 넘어 에러로 전파되지 않습니다.
pub trait InvocationRunner: Send + Sync {
    /// 실행 명세를 실행하고 결과를 분류합니다.
    fn run(&self, invocation: &Invocation) -> impl Future<Output = Outcome> + Send;
}

/// 자식 프로세스 실행기
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// 실행 타임아웃 (None이면 무제한)
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// 타임아웃 없는 실행기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 초 단위 설정값에서 생성합니다 (0이면 무제한).
    pub fn from_timeout_secs(secs: u64) -> Self {
        match secs {
            0 => Self::new(),
            secs => Self::new().with_timeout(Duration::from_secs(secs)),
        }
    }
}

impl InvocationRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Outcome {
        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(command = %invocation, "running report tool");

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    return Outcome::failure(
                        invocation,
                        format!("timed out after {}s", limit.as_secs()),
                    );
                }
            },
            None => cmd.output().await,
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                return Outcome::failure(
                    invocation,
                    format!("failed to launch {}: {e}", invocation.program()),
                );
            }
        };

        if output.status.success() {
            return Outcome::Success {
                output_path: invocation.output_path().to_path_buf(),
            };
        }

        let message = condense_stderr(&output.stderr)
            .unwrap_or_else(|| format!("exited with {}", output.status));
        Outcome::failure(invocation, message)
    }
}

/// stderr에서 마지막 비어 있지 않은 줄을 꺼냅니다.
///
/// 트레이스백 전체가 아니라 가장 구체적인 마지막 줄만 사용자에게 보여줍니다.
pub fn condense_stderr(stderr: &[u8]) -> Option<String> {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condense_takes_last_line_of_traceback() {
        let stderr = b"Traceback (most recent call last):\n  File \"/usr/bin/openvasreporting\", line 8, in <module>\n    sys.exit(main())\nFileNotFoundError: [Errno 2] No such file or directory: 'x.xml'\n";
        assert_eq!(
            condense_stderr(stderr).as_deref(),
            Some("FileNotFoundError: [Errno 2] No such file or directory: 'x.xml'")
        );
    }

    #[test]
    fn condense_skips_trailing_blank_lines() {
        let stderr = b"first\nValueError: bad level\n\n   \n";
        assert_eq!(condense_stderr(stderr).as_deref(), Some("ValueError: bad level"));
    }

    #[test]
    fn condense_empty_is_none() {
        assert_eq!(condense_stderr(b""), None);
        assert_eq!(condense_stderr(b"\n\n"), None);
    }

    #[test]
    fn condense_handles_crlf() {
        assert_eq!(condense_stderr(b"a\r\nb\r\n").as_deref(), Some("b"));
    }

    #[test]
    fn status_lines() {
        let ok = Outcome::Success {
            output_path: PathBuf::from("/w/servers_byV.xlsx"),
        };
        assert_eq!(ok.status_line(), "OVR /w/servers_byV.xlsx created.");
        assert!(ok.is_success());

        let failed = Outcome::Failure {
            output_path: PathBuf::from("/w/servers_byH.xlsx"),
            message: "ValueError: bad".to_owned(),
        };
        assert_eq!(
            failed.status_line(),
            "Error generating OVR /w/servers_byH.xlsx: ValueError: bad"
        );
        assert_eq!(failed.output_path(), Path::new("/w/servers_byH.xlsx"));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let failed = Outcome::Failure {
            output_path: PathBuf::from("/w/x_byV.xlsx"),
            message: "boom".to_owned(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        assert!(ProcessRunner::from_timeout_secs(0).timeout.is_none());
        assert_eq!(
            ProcessRunner::from_timeout_secs(90).timeout,
            Some(Duration::from_secs(90))
        );
    }
}
