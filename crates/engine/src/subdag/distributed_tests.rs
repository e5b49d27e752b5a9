// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use stepexec_adapters::FakeCoordinator;
use stepexec_core::{Operation, ParentRef, RunId, WorkerSelector};
use tokio::sync::watch;

use super::*;

fn task(child_run_id: RunId, root_ref: RootRef) -> Task {
    Task {
        dag_name: "child".into(),
        dag_yaml: "name: child".into(),
        operation: Operation::Start,
        child_run_id,
        root_ref,
        parent_ref: ParentRef::new("parent:P"),
        params: HashMap::new(),
        worker_selector: WorkerSelector(HashMap::new()),
    }
}

#[tokio::test(start_paused = true)]
async fn resolves_once_a_terminal_status_is_available() {
    let fake = FakeCoordinator::new();
    let child_run_id = RunId::new("C");
    let root_ref = RootRef::new("parent:R");
    fake.set_status(
        &child_run_id,
        &root_ref,
        RunStatus {
            is_active: false,
            success: true,
            nodes: vec![],
        },
    );
    let (_killed_tx, mut killed_rx) = watch::channel(false);

    let task = task(child_run_id, root_ref);
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        dispatch_and_wait(&fake, &fake, &task, &mut killed_rx),
    )
    .await
    .unwrap();

    assert!(result.unwrap().success);
    assert_eq!(fake.dispatched().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn not_found_is_treated_as_not_yet_complete() {
    let fake = FakeCoordinator::new();
    let child_run_id = RunId::new("C");
    let root_ref = RootRef::new("parent:R");
    let (_killed_tx, mut killed_rx) = watch::channel(false);

    let task = task(child_run_id.clone(), root_ref.clone());
    let handle = tokio::spawn(async move {
        dispatch_and_wait(&fake, &fake, &task, &mut killed_rx).await
    });

    tokio::time::advance(Duration::from_secs(3)).await;
    assert!(!handle.is_finished());
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn kill_without_confirmation_times_out() {
    let fake = FakeCoordinator::new();
    let child_run_id = RunId::new("C");
    let root_ref = RootRef::new("parent:R");
    let (killed_tx, mut killed_rx) = watch::channel(false);

    let fake = std::sync::Arc::new(fake);
    let poll_fake = fake.clone();
    let task_value = task(child_run_id, root_ref);
    let handle = tokio::spawn(async move {
        poll_until_terminal(
            poll_fake.as_ref(),
            &task_value.child_run_id,
            &task_value.root_ref,
            &mut killed_rx,
        )
        .await
    });

    tokio::time::advance(Duration::from_secs(1)).await;
    killed_tx.send(true).unwrap();
    tokio::time::advance(CANCEL_CONFIRMATION_WINDOW + Duration::from_secs(1)).await;

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(ExecError::CancelConfirmationTimeout)));
}
