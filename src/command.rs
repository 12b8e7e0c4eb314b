/*============================================================
  Synavera Project: Syn-HLE
  Module: synhle_core::command
  Etiquette: Synavera Script Etiquette (Rust Profile v1.1.1)
  ------------------------------------------------------------
  Purpose:
    Bounded invocation of platform tools (lipo, defaults,
    system_profiler, unzip, xattr) with uniform diagnostics.

  Security / Safety Notes:
    Executes tools with user privileges only; arguments are
    passed as discrete argv entries, never through a shell.

  Dependencies:
    tokio::process for async command execution.

  Operational Scope:
    Every OS introspection call in Syn-HLE goes through here
    so each carries a timeout and a typed error.

  Revision History:
    2026-03-02 COD  Bounded external command runner.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic command invocation with explicit checks
    - Timeouts on every blocking call
    - Reusable helpers for external command diagnostics
============================================================*/

use std::ffi::OsStr;
use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{HleError, Result};

/// Run `program args..` and return its raw output regardless of exit status.
pub async fn run_bounded<I, S>(program: &str, args: I, limit: Duration) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let rendered = render(program, &args);

    let child = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    match timeout(limit, child).await {
        Ok(result) => result.map_err(|err| map_spawn_error(err, program)),
        Err(_) => Err(HleError::Timeout {
            operation: rendered,
            seconds: limit.as_secs(),
        }),
    }
}

/// Run a command and require success, returning its stdout as UTF-8.
pub async fn run_checked<I, S>(program: &str, args: I, limit: Duration) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let rendered = render(program, &args);
    let output = run_bounded(program, &args, limit).await?;

    if !output.status.success() {
        return Err(HleError::CommandFailure {
            command: rendered,
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|err| {
        HleError::Serialization(format!("{rendered} emitted invalid UTF-8: {err}"))
    })
}

fn render<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

pub fn map_spawn_error(err: io::Error, command: &str) -> HleError {
    if err.kind() == io::ErrorKind::NotFound {
        HleError::CommandMissing {
            command: command.into(),
        }
    } else {
        HleError::Runtime(format!("Failed to spawn {command}: {err}"))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_command_missing() {
        let err = run_bounded("synhle-definitely-not-installed", ["--help"], Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, HleError::CommandMissing { .. }));
    }

    #[tokio::test]
    async fn slow_program_times_out() {
        let err = run_bounded("sleep", ["5"], Duration::from_millis(100))
            .await
            .unwrap_err();
        match err {
            HleError::Timeout { operation, .. } => assert_eq!(operation, "sleep 5"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn failing_program_reports_status() {
        let err = run_checked("sh", ["-c", "echo nope >&2; exit 3"], Duration::from_secs(2))
            .await
            .unwrap_err();
        match err {
            HleError::CommandFailure { status, stderr, .. } => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
