// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered registry of shell handlers, matched by case-folded shell
//! basename. First match wins; the Unix handler is a universal
//! fallback and must stay last.

use stepexec_core::ConfigError;

use crate::context::{BuildContext, BuiltCommand};
use crate::handlers::{CmdHandler, DirectHandler, NixShellHandler, PowerShellHandler, UnixHandler};

/// Case-folded-basename dispatch to a concrete command builder.
pub trait ShellHandler: Send + Sync {
    /// Whether this handler owns the given (already case-folded, bare)
    /// shell name. Called with `""` when no shell was configured.
    fn matches(&self, shell: &str) -> bool;

    fn build(&self, ctx: &BuildContext<'_>) -> Result<BuiltCommand, ConfigError>;
}

pub struct ShellRegistry {
    handlers: Vec<Box<dyn ShellHandler>>,
}

impl ShellRegistry {
    /// The handler order this runtime ships: direct, nix-shell,
    /// PowerShell, cmd, then the Unix catch-all.
    pub fn standard() -> Self {
        Self {
            handlers: vec![
                Box::new(DirectHandler),
                Box::new(NixShellHandler),
                Box::new(PowerShellHandler),
                Box::new(CmdHandler),
                Box::new(UnixHandler),
            ],
        }
    }

    pub fn build(&self, ctx: &BuildContext<'_>) -> Result<BuiltCommand, ConfigError> {
        let shell_name = ctx.shell.unwrap_or("");
        for handler in &self.handlers {
            if handler.matches(shell_name) {
                return handler.build(ctx);
            }
        }
        Err(ConfigError::NotRegistered(shell_name.to_string()))
    }
}

impl Default for ShellRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
