// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::executor::{no_cancellation, Executor as _};
use std::sync::{Arc as StdArc, Mutex as StdMutex};
use tokio::io::AsyncWrite;

#[derive(Clone, Default)]
struct CapturingSink(StdArc<StdMutex<Vec<u8>>>);

impl CapturingSink {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl AsyncWrite for CapturingSink {
    fn poll_write(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> std::task::Poll<std::io::Result<usize>> {
        self.0.lock().unwrap().extend_from_slice(buf);
        std::task::Poll::Ready(Ok(buf.len()))
    }
    fn poll_flush(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Ok(()))
    }
    fn poll_shutdown(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Ok(()))
    }
}

fn no_trace() -> Context {
    Context::new()
}

#[tokio::test]
async fn s1_echo_hello_no_shell() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = CommandConfig::new(dir.path());
    cfg.command = "echo".to_string();
    cfg.args = vec!["hello".to_string()];

    let exec = CommandExecutor::new(cfg, vec![], vec![], no_trace());
    let stdout = CapturingSink::default();
    exec.set_stdout(Box::new(stdout.clone()));
    exec.run(no_cancellation()).await.unwrap();

    assert_eq!(stdout.contents(), "hello\n");
    assert_eq!(exec.exit_code(), 0);
}

#[tokio::test]
async fn s2_errexit_script_stops_before_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = CommandConfig::new(dir.path());
    cfg.shell = Some("/bin/sh".to_string());
    cfg.script = Some("false\necho 'unreachable'".to_string());

    let exec = CommandExecutor::new(cfg, vec![], vec![], no_trace());
    let stdout = CapturingSink::default();
    exec.set_stdout(Box::new(stdout.clone()));
    let result = exec.run(no_cancellation()).await;

    assert!(result.is_err());
    assert_eq!(exec.exit_code(), 1);
    assert!(!stdout.contents().contains("unreachable"));
}

#[tokio::test]
async fn property_4_exit_code_fidelity() {
    for code in [0, 1, 17, 255] {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = CommandConfig::new(dir.path());
        cfg.shell = Some("sh".to_string());
        cfg.shell_command = Some(format!("exit {code}"));

        let exec = CommandExecutor::new(cfg, vec![], vec![], no_trace());
        let result = exec.run(no_cancellation()).await;

        assert_eq!(exec.exit_code(), code);
        if code == 0 {
            assert!(result.is_ok());
        } else {
            assert!(result.is_err());
        }
    }
}

#[tokio::test]
async fn property_5_stderr_tail_is_bounded_to_most_recent_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = CommandConfig::new(dir.path());
    cfg.shell = Some("sh".to_string());
    cfg.shell_command = Some("i=0; while [ $i -lt 2000 ]; do printf x >&2; i=$((i+1)); done".to_string());

    let exec = CommandExecutor::new(cfg, vec![], vec![], no_trace());
    exec.run(no_cancellation()).await.unwrap();

    assert_eq!(exec.exit_code(), 0);
    let tail = exec.stderr_tail();
    assert_eq!(tail.len(), stepexec_shell::tail::DEFAULT_MAX);
    assert!(tail.chars().all(|c| c == 'x'));
}

#[tokio::test]
async fn property_2_script_file_is_removed_after_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = CommandConfig::new(dir.path());
    cfg.shell = Some("/bin/sh".to_string());
    cfg.script = Some("exit 3".to_string());

    let exec = CommandExecutor::new(cfg, vec![], vec![], no_trace());
    let _ = exec.run(no_cancellation()).await;

    let leftover: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("dagu_script-"))
        .collect();
    assert!(leftover.is_empty());
}
