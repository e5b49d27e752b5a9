// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment collation for a single step invocation (§4.3 step 5):
//! process env, then the DAG's env, then the step's own env, then the
//! injected W3C trace-context vars — each layer overriding the last.

use std::collections::BTreeMap;

use opentelemetry::Context;
use stepexec_core::trace::inject_trace_env;

/// Merge layers in increasing-precedence order into a single ordered
/// env list suitable for `Command::envs`.
pub fn collate(
    process_env: impl IntoIterator<Item = (String, String)>,
    dag_env: &[(String, String)],
    step_env: &[(String, String)],
    trace_cx: &Context,
) -> Vec<(String, String)> {
    let mut merged: BTreeMap<String, String> = process_env.into_iter().collect();
    for (k, v) in dag_env {
        merged.insert(k.clone(), v.clone());
    }
    for (k, v) in step_env {
        merged.insert(k.clone(), v.clone());
    }

    let mut ordered: Vec<(String, String)> = merged.into_iter().collect();
    inject_trace_env(trace_cx, &mut ordered);
    ordered
}

/// `collate` seeded from the current process's real environment.
pub fn collate_with_process_env(
    dag_env: &[(String, String)],
    step_env: &[(String, String)],
    trace_cx: &Context,
) -> Vec<(String, String)> {
    collate(std::env::vars(), dag_env, step_env, trace_cx)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
