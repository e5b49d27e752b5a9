// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-executor-type capability declarations.

use crate::Step;

/// Evaluation options an executor can request for the step fields it
/// honours, e.g. whether the caller should expand `${VAR}` references
/// before handing the string to this executor, or leave that to the
/// shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalOptions {
    pub expand_env_before_eval: bool,
}

/// Which step features a given executor type honours. Consulted by the
/// (out-of-scope) parser to reject nonsensical combinations, and by the
/// evaluator to decide whether to expand environment variables itself or
/// delegate to the shell.
#[derive(Clone, Copy)]
pub struct ExecutorCapabilities {
    pub command: bool,
    pub multiple_commands: bool,
    pub script: bool,
    pub shell: bool,
    pub llm: bool,
    /// Optional hook producing per-step evaluation options.
    pub eval_options: Option<fn(&Step) -> EvalOptions>,
}

impl ExecutorCapabilities {
    /// Capabilities for the shell/command executor family: everything
    /// except LLM-specific prompt handling.
    pub const fn command_like() -> Self {
        Self {
            command: true,
            multiple_commands: true,
            script: true,
            shell: true,
            llm: false,
            eval_options: None,
        }
    }

    /// Capabilities for the sub-DAG executor: no shell/script surface at
    /// all, but a step can still carry a single "command" in the loose
    /// sense of a DAG reference.
    pub const fn subdag() -> Self {
        Self {
            command: false,
            multiple_commands: false,
            script: false,
            shell: false,
            llm: false,
            eval_options: None,
        }
    }

    /// Returns the evaluation options for `step`, falling back to the
    /// all-false default when no hook is registered.
    pub fn eval_options_for(&self, step: &Step) -> EvalOptions {
        self.eval_options.map(|f| f(step)).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "capabilities_tests.rs"]
mod tests;
