// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Construction-time errors, raised by the executor registry's factory
//! before `Run` is ever called.

use thiserror::Error;

/// Raised while building a step's executor or its command descriptor,
/// before any process is spawned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("step has neither a command nor a script")]
    NoCommandOrScript,
    #[error("the direct shell cannot parse a pre-joined command string, an explicit argv is required")]
    DirectShellNeedsArgv,
    #[error("shell '{0}' requires a non-empty argv")]
    EmptyShellArgs(String),
    #[error("executor type '{0}' is not registered")]
    NotRegistered(String),
    #[error("step executor type '{0}' does not support multiple commands")]
    MultipleCommandsUnsupported(String),
    #[error("step executor type '{0}' does not support a script body")]
    ScriptUnsupported(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
