// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task handed to the (out-of-scope) coordinator for distributed
//! sub-DAG dispatch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::id::{ParentRef, RootRef, RunId};
use crate::step::WorkerSelector;

/// Whether a distributed dispatch is a fresh start or a retry of a
/// previously-failed child run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Start,
    Retry,
}

/// A unit of work dispatched to the coordinator, which routes it to a
/// worker matching `worker_selector`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub dag_name: String,
    pub dag_yaml: String,
    pub operation: Operation,
    pub child_run_id: RunId,
    pub root_ref: RootRef,
    pub parent_ref: ParentRef,
    pub params: HashMap<String, String>,
    pub worker_selector: WorkerSelector,
}
