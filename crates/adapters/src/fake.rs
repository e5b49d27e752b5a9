// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `CoordinatorClient`/`RunStore` doubles for engine tests.
//! Gated behind `test-support` so production builds never link them.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use stepexec_core::{RootRef, RunId, RunStatus, Task};

use crate::coordinator::{CoordinatorClient, CoordinatorError};
use crate::run_store::{RunStore, RunStoreError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RunKey(String, String);

fn key(child_run_id: &RunId, root_ref: &RootRef) -> RunKey {
    RunKey(child_run_id.to_string(), root_ref.to_string())
}

/// A coordinator double that records dispatched tasks and cancel
/// requests, and serves canned statuses for polling.
#[derive(Default)]
pub struct FakeCoordinator {
    dispatched: Mutex<Vec<Task>>,
    cancelled: Mutex<Vec<RunKey>>,
    statuses: Mutex<HashMap<RunKey, RunStatus>>,
}

impl FakeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<Task> {
        self.dispatched.lock().clone()
    }

    pub fn was_cancelled(&self, child_run_id: &RunId, root_ref: &RootRef) -> bool {
        self.cancelled.lock().contains(&key(child_run_id, root_ref))
    }

    /// Install the status this fake returns for subsequent polls of
    /// `(child_run_id, root_ref)`.
    pub fn set_status(&self, child_run_id: &RunId, root_ref: &RootRef, status: RunStatus) {
        self.statuses
            .lock()
            .insert(key(child_run_id, root_ref), status);
    }
}

#[async_trait]
impl CoordinatorClient for FakeCoordinator {
    async fn dispatch(&self, task: &Task) -> Result<(), CoordinatorError> {
        self.dispatched.lock().push(task.clone());
        Ok(())
    }

    async fn request_child_cancel(
        &self,
        child_run_id: &RunId,
        root_ref: &RootRef,
    ) -> Result<(), CoordinatorError> {
        self.cancelled.lock().push(key(child_run_id, root_ref));
        Ok(())
    }
}

#[async_trait]
impl RunStore for FakeCoordinator {
    async fn get_status(
        &self,
        child_run_id: &RunId,
        root_ref: &RootRef,
    ) -> Result<RunStatus, RunStoreError> {
        self.statuses
            .lock()
            .get(&key(child_run_id, root_ref))
            .cloned()
            .ok_or(RunStoreError::NotFound)
    }
}
