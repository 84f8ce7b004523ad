use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::Invocation;
use crate::metrics::{PeakRss, SAMPLE_EVERY};
use crate::util::read_bytes;

/// Captured result of one program execution.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Process exited with status 0
    pub success: bool,
    pub timed_out: bool,
    pub elapsed: Duration,
    pub max_rss_kb: Option<u64>,
}

impl ExecutionResult {
    fn timed_out(elapsed: Duration, max_rss_kb: Option<u64>) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            success: false,
            timed_out: true,
            elapsed,
            max_rss_kb,
        }
    }

    /// Output shown to the user: stderr when the program wrote any, else stdout.
    pub fn effective_output(&self) -> &[u8] {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Run `invocation` once.
///
/// - `stdin_file`: when set, its bytes are piped to the program's stdin;
///   otherwise stdin is closed.
/// - On timeout the child is killed and a timed-out result is returned.
///   This is not an error.
/// - `track_memory`: sample peak RSS while the child runs; off unless the
///   number is going to be shown.
pub async fn execute(
    invocation: &Invocation,
    stdin_file: Option<&Path>,
    timeout: Duration,
    env: &BTreeMap<String, String>,
    track_memory: bool,
) -> Result<ExecutionResult> {
    let input = stdin_file.map(read_bytes).transpose()?;

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    for (k, v) in env {
        cmd.env(k, v);
    }

    let start = Instant::now();
    let mut child = cmd
        .spawn()
        .with_context(|| format!("Failed to spawn `{}`", invocation.display()))?;

    tracing::debug!(pid = ?child.id(), command = %invocation.display(), "spawned");

    let sampler = child
        .id()
        .filter(|_| track_memory)
        .map(|pid| PeakRss::watch(pid, SAMPLE_EVERY));

    // Written concurrently so a program that prints before reading cannot deadlock.
    let feeder = match (input, child.stdin.take()) {
        (Some(bytes), Some(mut stdin)) => Some(tokio::spawn(async move {
            // Broken pipe when the program exits without reading everything
            let _ = stdin.write_all(&bytes).await;
        })),
        _ => None,
    };

    let waited = tokio::time::timeout(timeout, child.wait_with_output()).await;
    let elapsed = start.elapsed();
    let max_rss_kb = sampler.and_then(PeakRss::finish);

    if let Some(feeder) = feeder {
        feeder.abort();
    }

    match waited {
        Ok(output) => {
            let output = output.context("Failed while waiting for program to complete")?;
            tracing::debug!(
                status = ?output.status,
                elapsed_ms = elapsed.as_millis(),
                "program finished"
            );
            Ok(ExecutionResult {
                stdout: output.stdout,
                stderr: output.stderr,
                success: output.status.success(),
                timed_out: false,
                elapsed,
                max_rss_kb,
            })
        }
        Err(_) => {
            tracing::debug!(timeout_ms = timeout.as_millis(), "program timed out, killed");
            Ok(ExecutionResult::timed_out(elapsed, max_rss_kb))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sh(script: &str) -> Invocation {
        Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[tokio::test]
    async fn feeds_file_as_stdin() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("case1");
        fs::write(&input, b"hello\nworld\n").unwrap();

        let res = execute(&sh("cat"), Some(input.as_path()), Duration::from_secs(5), &BTreeMap::new(), false)
            .await
            .unwrap();

        assert!(res.success);
        assert!(!res.timed_out);
        assert_eq!(res.stdout, b"hello\nworld\n");
    }

    #[tokio::test]
    async fn without_input_stdin_is_empty() {
        let res = execute(&sh("wc -c"), None, Duration::from_secs(5), &BTreeMap::new(), false)
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&res.stdout).trim(), "0");
    }

    #[tokio::test]
    async fn stderr_becomes_effective_output() {
        let res = execute(&sh("echo out; echo err 1>&2; exit 3"), None, Duration::from_secs(5), &BTreeMap::new(), false)
            .await
            .unwrap();
        assert!(!res.success);
        assert_eq!(res.stdout, b"out\n");
        assert_eq!(res.effective_output(), b"err\n");
    }

    #[tokio::test]
    async fn slow_program_times_out() {
        let start = Instant::now();
        let res = execute(&sh("sleep 5"), None, Duration::from_millis(200), &BTreeMap::new(), false)
            .await
            .unwrap();

        assert!(res.timed_out);
        assert!(!res.success);
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn env_is_injected() {
        let env = BTreeMap::from([("AUTOTEST_PROBE".to_string(), "on".to_string())]);
        let res = execute(&sh("printf %s \"$AUTOTEST_PROBE\""), None, Duration::from_secs(5), &env, false)
            .await
            .unwrap();
        assert_eq!(res.stdout, b"on");
    }

    #[tokio::test]
    async fn memory_is_not_sampled_unless_requested() {
        let res = execute(&sh("sleep 0.2"), None, Duration::from_secs(5), &BTreeMap::new(), false)
            .await
            .unwrap();
        assert!(res.success);
        assert_eq!(res.max_rss_kb, None);
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let inv = Invocation {
            program: "./definitely-not-here".to_string(),
            args: Vec::new(),
        };
        assert!(execute(&inv, None, Duration::from_secs(1), &BTreeMap::new(), false).await.is_err());
    }
}
