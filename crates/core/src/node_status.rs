// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status shape shared upward by both local and distributed sub-DAG
//! dispatch, and by any executor that implements `DetermineNodeStatus`.

use serde::{Deserialize, Serialize};

/// The status of a step's node, as reported to the scheduler.
///
/// Most executors only ever produce `Succeeded`/`Failed`/`Cancelled`;
/// `Waiting` is reserved for executors (e.g. a "wait for approval"
/// built-in, out of scope here) that need to park a step without
/// marking it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Succeeded,
    Failed,
    Cancelled,
    Waiting,
}

impl NodeStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, NodeStatus::Waiting)
    }
}
