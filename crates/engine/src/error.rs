// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the step execution runtime (§7).
//!
//! Configuration errors are raised during construction, by the shell
//! builder or the registry. Everything else happens inside `Run`.

use stepexec_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    /// Raised by the factory or the shell builder during construction.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Working directory couldn't be created, script couldn't be
    /// materialised, shebang couldn't be peeked, self-executable
    /// couldn't be located. Fatal; no retry.
    #[error("setup failed: {0}")]
    Setup(String),

    /// The OS refused to spawn the child.
    #[error("failed to start: {source}{}", tail_suffix(tail))]
    Start {
        source: std::io::Error,
        tail: String,
    },

    /// The child exited non-zero.
    #[error("command exited with code {exit_code}{}", tail_suffix(tail))]
    Runtime { exit_code: i32, tail: String },

    /// `killed` fired, or the caller's context ended, while the child
    /// was still executing.
    #[error("cancelled")]
    Cancelled,

    /// A sub-DAG dispatch or status-polling failure.
    #[error("sub-DAG error: {0}")]
    SubDag(String),

    /// The distributed cancellation-confirmation window elapsed with
    /// no terminal status observed.
    #[error("timed out waiting for cancellation to be confirmed")]
    CancelConfirmationTimeout,
}

fn tail_suffix(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!(" (stderr: {tail})")
    }
}

impl ExecError {
    /// The exit code the scheduler should surface for this error, per
    /// §4.3's extraction rule: a wrapped exit-code error surfaces `N`;
    /// anything else surfaces `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::Runtime { exit_code, .. } => *exit_code,
            _ => stepexec_core::exit_code::UNKNOWN_FAILURE_EXIT_CODE,
        }
    }
}
