// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Universal fallback: any shell name not claimed by a more specific
//! handler, including the canonical Unix shells and arbitrary others
//! (e.g. `fish`). Must stay last in the registry.

use stepexec_core::ConfigError;

use crate::context::{BuildContext, BuiltCommand};
use crate::registry::ShellHandler;
use crate::shells::{stem_lower, KNOWN_UNIX_SHELLS};

pub struct UnixHandler;

impl ShellHandler for UnixHandler {
    fn matches(&self, _shell: &str) -> bool {
        true
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<BuiltCommand, ConfigError> {
        if !ctx.command.is_empty() {
            return Ok(ctx.command_invocation());
        }

        let shell_name = ctx.shell.unwrap_or("sh").to_string();
        let inject_errexit =
            !ctx.user_specified_shell && KNOWN_UNIX_SHELLS.contains(&stem_lower(&shell_name).as_str());

        let mut args = ctx.shell_args.to_vec();
        if inject_errexit && !args.iter().any(|a| a == "-e") {
            args.push("-e".to_string());
        }

        if let Some(script) = ctx.script_path {
            args.push(script.to_string_lossy().into_owned());
        } else {
            args.push("-c".to_string());
            args.push(ctx.shell_command.unwrap_or_default().to_string());
        }

        Ok(BuiltCommand {
            program: shell_name,
            args,
        })
    }
}

#[cfg(test)]
#[path = "unix_tests.rs"]
mod tests;
