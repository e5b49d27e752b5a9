// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nix-shell -p <pkg>... --pure --run <string>`.

use stepexec_core::ConfigError;

use crate::context::{BuildContext, BuiltCommand};
use crate::registry::ShellHandler;
use crate::shells::stem_lower;

pub struct NixShellHandler;

impl ShellHandler for NixShellHandler {
    fn matches(&self, shell: &str) -> bool {
        stem_lower(shell) == "nix-shell"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<BuiltCommand, ConfigError> {
        let mut args = Vec::new();
        for pkg in ctx.shell_packages {
            args.push("-p".to_string());
            args.push(pkg.clone());
        }
        args.push("--pure".to_string());
        args.push("--run".to_string());

        let run_string = if !ctx.command.is_empty() {
            let mut parts = vec![ctx.command.to_string()];
            parts.extend(ctx.args.iter().cloned());
            if let Some(script) = ctx.script_path {
                parts.push(script.to_string_lossy().into_owned());
            }
            parts.join(" ")
        } else if let Some(script) = ctx.script_path {
            script.to_string_lossy().into_owned()
        } else {
            ctx.shell_command.unwrap_or_default().to_string()
        };

        let run_string = if !ctx.user_specified_shell && !run_string.starts_with("set -e") {
            format!("set -e; {run_string}")
        } else {
            run_string
        };
        args.push(run_string);

        Ok(BuiltCommand {
            program: ctx.shell.unwrap_or("nix-shell").to_string(),
            args,
        })
    }
}

#[cfg(test)]
#[path = "nix_shell_tests.rs"]
mod tests;
