// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The step data model produced by the (out-of-scope) DAG parser.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::id::StepName;

/// One `command` / `args` entry of a step's command list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Pre-joined `command args...` string, when the parser already
    /// flattened them (used by shells that want a single string rather
    /// than an argv).
    #[serde(default)]
    pub command_with_args: Option<String>,
}

/// Labels that route a sub-DAG to a remote worker pool instead of a
/// local fork. An empty selector means "run locally".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerSelector(pub HashMap<String, String>);

impl WorkerSelector {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the sub-DAG executor should resolve its child DAG from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubDagRef {
    /// Defined inline on the parent, keyed by name into the parent's
    /// "local DAGs" map.
    Local { name: String },
    /// Stored separately and fetched from the database by name.
    Stored { name: String },
}

/// A single unit of work in a DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: StepName,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub shell_packages: Vec<String>,
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// `""`, `"shell"`, `"command"`, `"subdag"`, `"http"`, ...
    #[serde(default)]
    pub executor_type: String,
    /// Executor-specific opaque configuration (e.g. sub-DAG worker
    /// selector, HTTP method/url — interpreted only by the matching
    /// executor).
    #[serde(default)]
    pub executor_config: serde_json::Value,
    #[serde(default)]
    pub depends: Vec<StepName>,
    #[serde(default)]
    pub subdag: Option<SubDagRef>,
    #[serde(default)]
    pub worker_selector: WorkerSelector,
}

impl Step {
    /// Whether the step carries more than one command entry.
    pub fn has_multiple_commands(&self) -> bool {
        self.commands.len() > 1
    }

    /// The step's single command entry, if it has exactly one.
    pub fn single_command(&self) -> Option<&CommandSpec> {
        match self.commands.as_slice() {
            [one] => Some(one),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
