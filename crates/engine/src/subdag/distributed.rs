// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The distributed dispatch path (§4.5 "Distributed path"): hand a
//! `Task` to the coordinator, then poll the run store for the child's
//! terminal status.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use stepexec_adapters::{CoordinatorClient, CoordinatorError, RunStore, RunStoreError};
use stepexec_core::{RootRef, RunId, RunStatus, Task};

use crate::error::ExecError;

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(15);
const CANCEL_CONFIRMATION_WINDOW: Duration = Duration::from_secs(30);
const CANCEL_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Dispatch `task` and poll until the child reaches a terminal state,
/// reacting to `killed` by switching into the cancellation-confirmation
/// window.
pub async fn dispatch_and_wait(
    coordinator: &dyn CoordinatorClient,
    store: &dyn RunStore,
    task: &Task,
    killed: &mut watch::Receiver<bool>,
) -> Result<RunStatus, ExecError> {
    coordinator
        .dispatch(task)
        .await
        .map_err(|e| ExecError::SubDag(format!("dispatch failed: {e}")))?;

    poll_until_terminal(
        store,
        &task.child_run_id,
        &task.root_ref,
        killed,
    )
    .await
}

async fn fetch(
    store: &dyn RunStore,
    child_run_id: &RunId,
    root_ref: &RootRef,
) -> Result<Option<RunStatus>, ExecError> {
    match store.get_status(child_run_id, root_ref).await {
        Ok(status) => Ok(Some(status)),
        Err(RunStoreError::NotFound) => Ok(None),
        Err(e) => Err(ExecError::SubDag(format!("status poll failed: {e}"))),
    }
}

async fn poll_until_terminal(
    store: &dyn RunStore,
    child_run_id: &RunId,
    root_ref: &RootRef,
    killed: &mut watch::Receiver<bool>,
) -> Result<RunStatus, ExecError> {
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut elapsed = Duration::ZERO;
    let mut last_log = Duration::ZERO;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                elapsed += POLL_INTERVAL;
                if elapsed - last_log >= PROGRESS_LOG_INTERVAL {
                    tracing::info!(%child_run_id, elapsed_s = elapsed.as_secs(), "waiting for sub-DAG completion");
                    last_log = elapsed;
                }
                if let Some(status) = fetch(store, child_run_id, root_ref).await? {
                    if !status.is_active {
                        return Ok(status);
                    }
                }
            }
            changed = killed.changed() => {
                if changed.is_ok() && *killed.borrow() {
                    return wait_for_cancellation_confirmation(store, child_run_id, root_ref).await;
                }
            }
        }
    }
}

/// After `Kill` fires, keep polling for up to
/// [`CANCEL_CONFIRMATION_WINDOW`]; a terminal status arriving inside
/// the window wins, otherwise report a timeout (§4.5 "Cancellation
/// during distributed wait").
async fn wait_for_cancellation_confirmation(
    store: &dyn RunStore,
    child_run_id: &RunId,
    root_ref: &RootRef,
) -> Result<RunStatus, ExecError> {
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut elapsed = Duration::ZERO;
    let mut last_log = Duration::ZERO;

    while elapsed < CANCEL_CONFIRMATION_WINDOW {
        ticker.tick().await;
        elapsed += POLL_INTERVAL;
        if elapsed - last_log >= CANCEL_LOG_INTERVAL {
            tracing::info!(%child_run_id, elapsed_s = elapsed.as_secs(), "waiting for cancellation confirmation");
            last_log = elapsed;
        }
        if let Some(status) = fetch(store, child_run_id, root_ref).await? {
            if !status.is_active {
                return Ok(status);
            }
        }
    }

    Err(ExecError::CancelConfirmationTimeout)
}

/// Forward a cancellation request for one in-flight distributed child.
/// A "not found" child is benign (§4.5 "Fan-in Kill").
pub async fn request_cancel(
    coordinator: &dyn CoordinatorClient,
    child_run_id: &RunId,
    root_ref: &RootRef,
) -> Result<(), ExecError> {
    match coordinator.request_child_cancel(child_run_id, root_ref).await {
        Ok(()) | Err(CoordinatorError::NotFound) => Ok(()),
        Err(e) => Err(ExecError::SubDag(format!("cancel request failed: {e}"))),
    }
}

#[cfg(test)]
#[path = "distributed_tests.rs"]
mod tests;
