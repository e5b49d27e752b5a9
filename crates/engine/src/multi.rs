// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential execution of a step's command list (§4.4).

use std::sync::Arc;

use async_trait::async_trait;
use opentelemetry::Context;
use parking_lot::Mutex;

use stepexec_core::CommandConfig;

use crate::command::CommandExecutor;
use crate::error::ExecError;
use crate::executor::{CancelSignal, DynWriter, ExitCodeProvider, Executor};

/// Runs each [`CommandConfig`] in turn, stopping at the first one that
/// exits non-zero. `Kill` forwards to whichever child is currently
/// running, if any (§4.4, §5: "a single mutex guards the current
/// child executor pointer").
pub struct MultiCommandExecutor {
    configs: Vec<CommandConfig>,
    dag_env: Vec<(String, String)>,
    step_env: Vec<(String, String)>,
    trace_cx: Context,
    stdout: Mutex<Option<DynWriter>>,
    stderr: Mutex<Option<DynWriter>>,
    current: Mutex<Option<Arc<CommandExecutor>>>,
    exit_code: Mutex<i32>,
}

impl MultiCommandExecutor {
    pub fn new(
        configs: Vec<CommandConfig>,
        dag_env: Vec<(String, String)>,
        step_env: Vec<(String, String)>,
        trace_cx: Context,
    ) -> Self {
        Self {
            configs,
            dag_env,
            step_env,
            trace_cx,
            stdout: Mutex::new(None),
            stderr: Mutex::new(None),
            current: Mutex::new(None),
            exit_code: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Executor for MultiCommandExecutor {
    fn set_stdout(&self, writer: DynWriter) {
        *self.stdout.lock() = Some(writer);
    }

    fn set_stderr(&self, writer: DynWriter) {
        *self.stderr.lock() = Some(writer);
    }

    async fn run(&self, cancel: CancelSignal) -> Result<(), ExecError> {
        // Only the final command's stdout/stderr reach the step's own
        // sinks; earlier commands run with theirs discarded, matching
        // a shell's `cmd1; cmd2; cmd3` semantics where only the last
        // stage is normally observed by the caller.
        let last = self.configs.len().saturating_sub(1);

        for (index, cfg) in self.configs.iter().enumerate() {
            if *cancel.borrow() {
                return Err(ExecError::Cancelled);
            }

            let exec = Arc::new(CommandExecutor::new(
                cfg.clone(),
                self.dag_env.clone(),
                self.step_env.clone(),
                self.trace_cx.clone(),
            ));

            if index == last {
                if let Some(writer) = self.stdout.lock().take() {
                    exec.set_stdout(writer);
                }
                if let Some(writer) = self.stderr.lock().take() {
                    exec.set_stderr(writer);
                }
            }

            *self.current.lock() = Some(Arc::clone(&exec));
            let result = exec.run(cancel.clone()).await;
            *self.exit_code.lock() = exec.exit_code();

            if let Err(err) = result {
                return Err(ExecError::Runtime {
                    exit_code: exec.exit_code(),
                    tail: format!("command {} failed: {err}", index + 1),
                });
            }

            // Checked after each child completes, between commands
            // (§4.4): a context that ended while the last command was
            // running still stops the remaining ones from starting.
            if *cancel.borrow() {
                return Err(ExecError::Cancelled);
            }
        }

        Ok(())
    }

    async fn kill(&self, sig: nix::sys::signal::Signal) -> Result<(), ExecError> {
        let current = self.current.lock().clone();
        if let Some(current) = current {
            current.kill(sig).await?;
        }
        Ok(())
    }
}

impl ExitCodeProvider for MultiCommandExecutor {
    fn exit_code(&self) -> i32 {
        *self.exit_code.lock()
    }
}

#[cfg(test)]
#[path = "multi_tests.rs"]
mod tests;
