// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows PowerShell and PowerShell Core.

use stepexec_core::ConfigError;

use crate::context::{BuildContext, BuiltCommand};
use crate::registry::ShellHandler;
use crate::shells::stem_lower;
use crate::win_path;

pub struct PowerShellHandler;

impl ShellHandler for PowerShellHandler {
    fn matches(&self, shell: &str) -> bool {
        matches!(stem_lower(shell).as_str(), "powershell" | "pwsh")
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<BuiltCommand, ConfigError> {
        let shell_prog = ctx.shell.unwrap_or("powershell").to_string();

        if !ctx.command.is_empty() {
            return Ok(ctx.command_invocation());
        }

        if let Some(script) = ctx.script_path {
            return Ok(BuiltCommand {
                program: shell_prog,
                args: vec![
                    "-ExecutionPolicy".to_string(),
                    "Bypass".to_string(),
                    "-File".to_string(),
                    script.to_string_lossy().into_owned(),
                ],
            });
        }

        let raw = ctx.shell_command.unwrap_or_default();
        let normalized = win_path::normalize(raw, ctx.dir);
        let mut args = ctx.shell_args.to_vec();
        if !args.iter().any(|a| a == "-Command") {
            args.push("-Command".to_string());
        }
        args.push(normalized);
        Ok(BuiltCommand {
            program: shell_prog,
            args,
        })
    }
}

#[cfg(test)]
#[path = "powershell_tests.rs"]
mod tests;
