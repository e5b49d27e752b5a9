// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The status shape returned by both the local fork path (queried from
//! the database by run id) and the distributed path (queried from the
//! coordinator), so the sub-DAG executor can treat them uniformly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One node (step) of a completed or in-progress child run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub step_name: String,
    /// `key=value` strings as recorded by the step; values may legally
    /// contain further `=` characters, so only the first one is split
    /// on.
    #[serde(default)]
    pub output_vars: Vec<String>,
}

/// The status of a (possibly still running) child DAG run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    pub is_active: bool,
    pub success: bool,
    #[serde(default)]
    pub nodes: Vec<NodeResult>,
}

impl RunStatus {
    /// Reconstruct the run's output map from its nodes' `key=value`
    /// strings, splitting on the first `=` only.
    pub fn outputs(&self) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for node in &self.nodes {
            for kv in &node.output_vars {
                if let Some((k, v)) = kv.split_once('=') {
                    out.insert(k.to_string(), v.to_string());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_splits_on_first_equals_only() {
        let status = RunStatus {
            is_active: false,
            success: true,
            nodes: vec![NodeResult {
                step_name: "build".into(),
                output_vars: vec!["URL=https://x/y=z".into(), "COUNT=3".into()],
            }],
        };
        let outputs = status.outputs();
        assert_eq!(outputs.get("URL"), Some(&"https://x/y=z".to_string()));
        assert_eq!(outputs.get("COUNT"), Some(&"3".to_string()));
    }

    #[test]
    fn outputs_ignores_malformed_entries() {
        let status = RunStatus {
            is_active: false,
            success: true,
            nodes: vec![NodeResult {
                step_name: "build".into(),
                output_vars: vec!["no-equals-sign".into()],
            }],
        };
        assert!(status.outputs().is_empty());
    }

    #[test]
    fn outputs_merge_across_nodes() {
        let status = RunStatus {
            is_active: false,
            success: true,
            nodes: vec![
                NodeResult {
                    step_name: "a".into(),
                    output_vars: vec!["X=1".into()],
                },
                NodeResult {
                    step_name: "b".into(),
                    output_vars: vec!["Y=2".into()],
                },
            ],
        };
        let outputs = status.outputs();
        assert_eq!(outputs.len(), 2);
    }
}
