// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pure, builder-facing view of a step invocation.
//!
//! Distinct from [`stepexec_core::CommandConfig`]: by the time a
//! [`BuildContext`] exists, a script body (if any) has already been
//! materialised to a file on disk, so the builder only ever deals with
//! paths, never script contents.

use std::path::Path;

/// Inputs to a single [`crate::registry::ShellRegistry::build`] call.
pub struct BuildContext<'a> {
    pub dir: &'a Path,
    pub command: &'a str,
    pub args: &'a [String],
    pub script_path: Option<&'a Path>,
    pub shell: Option<&'a str>,
    pub shell_args: &'a [String],
    pub shell_command: Option<&'a str>,
    pub shell_packages: &'a [String],
    pub user_specified_shell: bool,
}

/// The concrete `(program, argv)` a handler produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl<'a> BuildContext<'a> {
    fn script_arg(&self) -> Option<String> {
        self.script_path
            .map(|p| p.to_string_lossy().into_owned())
    }

    /// `command args [script]`, used by the "bypass the shell entirely"
    /// branch shared by the direct, PowerShell, and Unix handlers.
    pub(crate) fn command_invocation(&self) -> BuiltCommand {
        let mut args = self.args.to_vec();
        if let Some(script) = self.script_arg() {
            args.push(script);
        }
        BuiltCommand {
            program: self.command.to_string(),
            args,
        }
    }
}
