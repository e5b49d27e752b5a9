// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-invocation command executor (§4.3).

use std::sync::Arc;

use async_trait::async_trait;
use opentelemetry::Context;
use parking_lot::Mutex;
use tokio::process::Child;

use stepexec_adapters::process::isolate_process_group;
use stepexec_core::{CommandConfig, ConfigError};
use stepexec_shell::context::BuildContext;
use stepexec_shell::registry::ShellRegistry;
use stepexec_shell::script::{materialize, MaterializedScript};
use stepexec_shell::shebang;
use stepexec_shell::tail::{TailHandle, TailWriter};

use crate::env::collate_with_process_env;
use crate::error::ExecError;
use crate::executor::{CancelSignal, DynWriter, ExitCodeProvider, Executor};

/// `(cmd handle, exit code, stderr tail)`, guarded by a single mutex
/// released around the blocking `wait` so `kill` stays responsive (§5).
struct Guarded {
    child: Option<Arc<tokio::sync::Mutex<Child>>>,
    exit_code: Option<i32>,
    tail: Option<TailHandle>,
}

pub struct CommandExecutor {
    cfg: CommandConfig,
    dag_env: Vec<(String, String)>,
    step_env: Vec<(String, String)>,
    trace_cx: Context,
    registry: ShellRegistry,
    stdout: Mutex<Option<DynWriter>>,
    stderr: Mutex<Option<DynWriter>>,
    guarded: Mutex<Guarded>,
}

impl CommandExecutor {
    pub fn new(
        cfg: CommandConfig,
        dag_env: Vec<(String, String)>,
        step_env: Vec<(String, String)>,
        trace_cx: Context,
    ) -> Self {
        Self {
            cfg,
            dag_env,
            step_env,
            trace_cx,
            registry: ShellRegistry::standard(),
            stdout: Mutex::new(None),
            stderr: Mutex::new(None),
            guarded: Mutex::new(Guarded {
                child: None,
                exit_code: None,
                tail: None,
            }),
        }
    }

    fn build(&self, script_path: Option<&std::path::Path>) -> Result<stepexec_shell::context::BuiltCommand, ConfigError> {
        if self.cfg.command.is_empty() && self.cfg.script.is_none() && self.cfg.shell_command.is_none() {
            return Err(ConfigError::NoCommandOrScript);
        }
        let ctx = BuildContext {
            dir: &self.cfg.dir,
            command: &self.cfg.command,
            args: &self.cfg.args,
            script_path,
            shell: self.cfg.shell.as_deref(),
            shell_args: &self.cfg.shell_args,
            shell_command: self.cfg.shell_command.as_deref(),
            shell_packages: &self.cfg.shell_packages,
            user_specified_shell: self.cfg.user_specified_shell,
        };
        self.registry.build(&ctx)
    }

    /// Dispatch order from §4.3 step 4, returning `(program, argv, _materialized script, handle used for the tail)`.
    fn resolve_invocation(
        &self,
    ) -> Result<(String, Vec<String>, Option<MaterializedScript>), ExecError> {
        let materialized = match &self.cfg.script {
            Some(body) => Some(
                materialize(&self.cfg.dir, self.cfg.shell.as_deref(), body)
                    .map_err(|e| ExecError::Setup(format!("failed to materialize script: {e}")))?,
            ),
            None => None,
        };

        // shell + script, shell not user-specified: try the shebang
        // interpreter before falling back to the configured shell.
        if let Some(script) = &materialized {
            if self.cfg.shell.is_some() && self.cfg.command.is_empty() && !self.cfg.user_specified_shell {
                let line = shebang::peek_first_line(script.path())
                    .map_err(|e| ExecError::Setup(format!("failed to detect shebang: {e}")))?;
                if let Some((interpreter, mut args)) = shebang::shebang_interpreter(&line) {
                    args.push(script.path().to_string_lossy().into_owned());
                    return Ok((interpreter, args, materialized));
                }
            }
        }

        let script_path = materialized.as_ref().map(MaterializedScript::path);
        let built = self.build(script_path)?;
        Ok((built.program, built.args, materialized))
    }

    /// The stderr tail captured so far, bounded to [`tail::DEFAULT_MAX`]
    /// bytes (§4.6). Exposed for tests exercising property 5 directly
    /// against the running executor rather than the tail writer alone.
    #[cfg(test)]
    pub(crate) fn stderr_tail(&self) -> String {
        self.guarded
            .lock()
            .tail
            .as_ref()
            .map(TailHandle::tail)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Executor for CommandExecutor {
    fn set_stdout(&self, writer: DynWriter) {
        *self.stdout.lock() = Some(writer);
    }

    fn set_stderr(&self, writer: DynWriter) {
        *self.stderr.lock() = Some(writer);
    }

    async fn run(&self, cancel: CancelSignal) -> Result<(), ExecError> {
        if *cancel.borrow() {
            return Err(ExecError::Cancelled);
        }

        let (program, args, _script_guard) = self.resolve_invocation()?;

        tokio::fs::create_dir_all(&self.cfg.dir)
            .await
            .map_err(|e| ExecError::Setup(format!("failed to create working directory: {e}")))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = tokio::fs::set_permissions(
                &self.cfg.dir,
                std::fs::Permissions::from_mode(0o750),
            )
            .await;
        }

        let env = collate_with_process_env(&self.dag_env, &self.step_env, &self.trace_cx);

        let mut stdout_sink = self.stdout.lock().take();
        let mut stderr_sink = self.stderr.lock().take();

        let has_stdout_sink = stdout_sink.is_some();
        let mut cmd = tokio::process::Command::new(&program);
        cmd.args(&args).current_dir(&self.cfg.dir).envs(env);
        cmd.stdout(if has_stdout_sink {
            std::process::Stdio::piped()
        } else {
            std::process::Stdio::null()
        });
        cmd.stderr(std::process::Stdio::piped());
        isolate_process_group(&mut cmd);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                return Err(ExecError::Start {
                    source,
                    tail: String::new(),
                })
            }
        };

        let mut stdout_tasks = Vec::new();
        if let (Some(mut stdout), Some(mut sink)) = (child.stdout.take(), stdout_sink.take()) {
            stdout_tasks.push(tokio::spawn(async move {
                let _ = tokio::io::copy(&mut stdout, &mut sink).await;
            }));
        }

        let stderr_sink = stderr_sink
            .take()
            .unwrap_or_else(|| Box::new(tokio::io::sink()) as DynWriter);
        let mut tail_writer = TailWriter::new(stderr_sink);
        let tail_handle: TailHandle = tail_writer.handle();
        self.guarded.lock().tail = Some(tail_handle.clone());
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let _ = tokio::io::copy(&mut stderr, &mut tail_writer).await;
            })
        });

        let shared_child = Arc::new(tokio::sync::Mutex::new(child));
        {
            let mut guard = self.guarded.lock();
            guard.child = Some(Arc::clone(&shared_child));
        }

        let status = shared_child.lock().await.wait().await;

        for task in stdout_tasks {
            let _ = task.await;
        }
        if let Some(task) = stderr_task {
            let _ = task.await;
        }

        let status = match status {
            Ok(status) => status,
            Err(source) => {
                return Err(ExecError::Start {
                    source,
                    tail: tail_handle.tail(),
                })
            }
        };

        let code = stepexec_core::exit_code::from_exit_status(status);
        {
            let mut guard = self.guarded.lock();
            guard.exit_code = Some(code);
            guard.child = None;
        }

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::Runtime {
                exit_code: code,
                tail: tail_handle.tail(),
            })
        }
    }

    async fn kill(&self, sig: nix::sys::signal::Signal) -> Result<(), ExecError> {
        let child = { self.guarded.lock().child.clone() };
        let Some(child) = child else {
            return Ok(());
        };
        let pid = child.lock().await.id();
        if let Some(pid) = pid {
            let _ = stepexec_adapters::process::kill_process_group(pid as i32, sig);
        }
        Ok(())
    }
}

impl ExitCodeProvider for CommandExecutor {
    fn exit_code(&self) -> i32 {
        self.guarded.lock().exit_code.unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
