// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The coordinator: an external service that dispatches tasks to
//! remote workers and holds their status. The transport itself is out
//! of scope here — this crate only defines the contract the sub-DAG
//! executor dispatches against.

use async_trait::async_trait;
use thiserror::Error;

use stepexec_core::{RootRef, RunId, Task};

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("coordinator unavailable: {0}")]
    Unavailable(String),
    #[error("child run not found")]
    NotFound,
    #[error("coordinator error: {0}")]
    Other(String),
}

/// Dispatch and cancellation surface the sub-DAG executor's
/// distributed path consumes.
#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    async fn dispatch(&self, task: &Task) -> Result<(), CoordinatorError>;

    /// Ask the coordinator to cancel a child run. A "not found" child
    /// is benign — it may have already completed.
    async fn request_child_cancel(
        &self,
        child_run_id: &RunId,
        root_ref: &RootRef,
    ) -> Result<(), CoordinatorError>;
}
