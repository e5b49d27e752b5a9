// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows `cmd.exe`.
//!
//! Resolving the bare shell name to a full path avoids
//! interpreter-relative-path restrictions some runtimes apply to a
//! bare `cmd.exe` invocation.

use stepexec_core::ConfigError;

use crate::context::{BuildContext, BuiltCommand};
use crate::registry::ShellHandler;
use crate::shells::stem_lower;
use crate::win_path;

pub struct CmdHandler;

impl ShellHandler for CmdHandler {
    fn matches(&self, shell: &str) -> bool {
        stem_lower(shell) == "cmd"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<BuiltCommand, ConfigError> {
        if !ctx.command.is_empty() {
            return Ok(ctx.command_invocation());
        }

        let program = resolve_cmd_exe(ctx.shell.unwrap_or("cmd"));

        if let Some(script) = ctx.script_path {
            return Ok(BuiltCommand {
                program,
                args: vec!["/c".to_string(), script.to_string_lossy().into_owned()],
            });
        }

        let raw = ctx.shell_command.unwrap_or_default();
        let normalized = win_path::normalize(raw, ctx.dir);
        let mut args = ctx.shell_args.to_vec();
        if !args.iter().any(|a| a == "/c") {
            args.push("/c".to_string());
        }
        args.push(normalized);
        Ok(BuiltCommand { program, args })
    }
}

/// `COMSPEC` -> `C:\Windows\System32\cmd.exe` -> `%SystemRoot%\System32\cmd.exe`,
/// first existing wins. Only applied to the bare `cmd`/`cmd.exe` name;
/// an explicit path is used verbatim.
fn resolve_cmd_exe(shell: &str) -> String {
    let is_bare = !shell.contains('/') && !shell.contains('\\');
    if !is_bare || stem_lower(shell) != "cmd" {
        return shell.to_string();
    }
    if let Ok(comspec) = std::env::var("COMSPEC") {
        if !comspec.is_empty() {
            return comspec;
        }
    }
    let well_known = std::path::Path::new("C:\\Windows\\System32\\cmd.exe");
    if well_known.is_file() {
        return well_known.to_string_lossy().into_owned();
    }
    if let Ok(system_root) = std::env::var("SystemRoot") {
        return format!("{system_root}\\System32\\cmd.exe");
    }
    shell.to_string()
}

#[cfg(test)]
#[path = "cmd_tests.rs"]
mod tests;
