// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No shell configured: run `command` with `args` as a child process
//! directly, appending the materialised script path if present.
//!
//! Rejects a step that carries only a pre-joined shell-command string
//! with no command and no script — there is no shell here to parse it.

use stepexec_core::ConfigError;

use crate::context::{BuildContext, BuiltCommand};
use crate::registry::ShellHandler;

pub struct DirectHandler;

impl ShellHandler for DirectHandler {
    fn matches(&self, shell: &str) -> bool {
        shell.is_empty()
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<BuiltCommand, ConfigError> {
        if ctx.command.is_empty() && ctx.script_path.is_none() {
            if ctx.shell_command.is_some() {
                return Err(ConfigError::DirectShellNeedsArgv);
            }
            return Err(ConfigError::NoCommandOrScript);
        }
        Ok(ctx.command_invocation())
    }
}

#[cfg(test)]
#[path = "direct_tests.rs"]
mod tests;
