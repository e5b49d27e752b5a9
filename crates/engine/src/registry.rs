// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor registry (§4.1): a process-wide mapping from an
//! executor-type string to `(factory, validator, capabilities)`.
//! Registration happens once during initialisation, matching the
//! teacher's "adapters wired up once in `main.rs`" pattern; the
//! registry itself is never mutated after `build()` returns. The
//! validator is looked up by the same key during DAG load, so a
//! malformed step is rejected before any executor is constructed.

use std::collections::HashMap;
use std::sync::Arc;

use opentelemetry::Context;
use parking_lot::Mutex;

use stepexec_core::{CommandConfig, ConfigError, ExecutorCapabilities, Step};

use crate::command::CommandExecutor;
use crate::executor::Executor;
use crate::multi::MultiCommandExecutor;

type Factory = Arc<
    dyn Fn(&Step, Vec<(String, String)>, Vec<(String, String)>, Context) -> Result<Box<dyn Executor>, ConfigError>
        + Send
        + Sync,
>;

/// A step-validator (§4.1, §4.3): checked against a step at DAG-load
/// time, before the factory is ever asked to construct an executor.
type Validator = Arc<dyn Fn(&Step) -> Result<(), ConfigError> + Send + Sync>;

struct Registration {
    factory: Factory,
    validator: Validator,
    capabilities: ExecutorCapabilities,
}

/// Capability gates shared by every executor type: a step using a
/// feature its executor doesn't advertise is a configuration error,
/// not a runtime one.
fn validate_against_capabilities(step: &Step, caps: ExecutorCapabilities) -> Result<(), ConfigError> {
    if step.has_multiple_commands() && !caps.multiple_commands {
        return Err(ConfigError::MultipleCommandsUnsupported(
            step.executor_type.clone(),
        ));
    }
    if step.script.is_some() && !caps.script {
        return Err(ConfigError::ScriptUnsupported(step.executor_type.clone()));
    }
    Ok(())
}

/// Validator for the shell/command executor type (§4.1, §4.3, §7): a
/// step must have something to run, and an explicit `shell` with
/// nothing for it to execute is rejected immediately rather than left
/// for the shell handler to fail on at run time.
fn shell_validator(step: &Step) -> Result<(), ConfigError> {
    validate_against_capabilities(step, ExecutorCapabilities::command_like())?;

    if step.commands.is_empty() && step.script.is_none() {
        return Err(ConfigError::NoCommandOrScript);
    }

    if let Some(shell) = &step.shell {
        let has_content = step.script.is_some()
            || step
                .commands
                .iter()
                .any(|c| !c.command.is_empty() || c.command_with_args.is_some());
        if !has_content {
            return Err(ConfigError::EmptyShellArgs(shell.clone()));
        }
    }

    Ok(())
}

/// Builds a step's command configs from its shared fields plus a
/// single command entry.
fn command_config(step: &Step, command: &str, args: &[String]) -> CommandConfig {
    CommandConfig {
        dir: step.dir.clone().unwrap_or_default(),
        command: command.to_string(),
        args: args.to_vec(),
        script: step.script.clone(),
        shell: step.shell.clone(),
        shell_args: Vec::new(),
        shell_command: None,
        shell_packages: step.shell_packages.clone(),
        user_specified_shell: step.shell.is_some(),
    }
}

fn shell_factory(
    step: &Step,
    dag_env: Vec<(String, String)>,
    step_env: Vec<(String, String)>,
    trace_cx: Context,
) -> Result<Box<dyn Executor>, ConfigError> {
    shell_validator(step)?;

    if step.has_multiple_commands() {
        let configs = step
            .commands
            .iter()
            .map(|c| command_config(step, &c.command, &c.args))
            .collect();
        return Ok(Box::new(MultiCommandExecutor::new(
            configs, dag_env, step_env, trace_cx,
        )));
    }

    let mut cfg = match step.single_command() {
        Some(spec) => command_config(step, &spec.command, &spec.args),
        None => command_config(step, "", &[]),
    };
    if let Some(single) = step.single_command() {
        if let Some(joined) = &single.command_with_args {
            cfg.shell_command = Some(joined.clone());
        }
    }

    Ok(Box::new(CommandExecutor::new(
        cfg, dag_env, step_env, trace_cx,
    )))
}

/// A process-wide registry of executor types. Construct once via
/// [`ExecutorRegistry::standard`] (or `builder()` for a custom set)
/// and share behind an `Arc`.
pub struct ExecutorRegistry {
    registrations: Mutex<HashMap<String, Registration>>,
}

impl ExecutorRegistry {
    pub fn builder() -> ExecutorRegistryBuilder {
        ExecutorRegistryBuilder::default()
    }

    /// The shell/command executor registered under its three
    /// backwards-compatible aliases (§4.1): `""`, `"shell"`, `"command"`.
    pub fn standard() -> Self {
        Self::builder()
            .register(
                "",
                shell_factory,
                shell_validator,
                ExecutorCapabilities::command_like(),
            )
            .register(
                "shell",
                shell_factory,
                shell_validator,
                ExecutorCapabilities::command_like(),
            )
            .register(
                "command",
                shell_factory,
                shell_validator,
                ExecutorCapabilities::command_like(),
            )
            .build()
    }

    pub fn new_executor(
        &self,
        step: &Step,
        dag_env: Vec<(String, String)>,
        step_env: Vec<(String, String)>,
        trace_cx: Context,
    ) -> Result<Box<dyn Executor>, ConfigError> {
        let registrations = self.registrations.lock();
        let registration = registrations
            .get(&step.executor_type)
            .ok_or_else(|| ConfigError::NotRegistered(step.executor_type.clone()))?;
        (registration.factory)(step, dag_env, step_env, trace_cx)
    }

    /// The capabilities published for `executor_type`, for the
    /// (out-of-scope) parser to consult when validating a step.
    pub fn capabilities(&self, executor_type: &str) -> Result<ExecutorCapabilities, ConfigError> {
        self.registrations
            .lock()
            .get(executor_type)
            .map(|r| r.capabilities)
            .ok_or_else(|| ConfigError::NotRegistered(executor_type.to_string()))
    }

    /// The step-validator for `executor_type` (§4.1), looked up by the
    /// same key as the factory during DAG load.
    pub fn validator_for(&self, executor_type: &str) -> Result<Validator, ConfigError> {
        self.registrations
            .lock()
            .get(executor_type)
            .map(|r| Arc::clone(&r.validator))
            .ok_or_else(|| ConfigError::NotRegistered(executor_type.to_string()))
    }
}

#[derive(Default)]
pub struct ExecutorRegistryBuilder {
    registrations: HashMap<String, Registration>,
}

impl ExecutorRegistryBuilder {
    pub fn register(
        mut self,
        executor_type: impl Into<String>,
        factory: impl Fn(&Step, Vec<(String, String)>, Vec<(String, String)>, Context) -> Result<Box<dyn Executor>, ConfigError>
            + Send
            + Sync
            + 'static,
        validator: impl Fn(&Step) -> Result<(), ConfigError> + Send + Sync + 'static,
        capabilities: ExecutorCapabilities,
    ) -> Self {
        self.registrations.insert(
            executor_type.into(),
            Registration {
                factory: Arc::new(factory),
                validator: Arc::new(validator),
                capabilities,
            },
        );
        self
    }

    pub fn build(self) -> ExecutorRegistry {
        ExecutorRegistry {
            registrations: Mutex::new(self.registrations),
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
