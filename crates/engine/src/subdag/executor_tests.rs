// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use stepexec_adapters::FakeCoordinator;

use super::*;
use crate::executor::{no_cancellation, Executor as _};

fn no_trace() -> Context {
    Context::new()
}

fn local_cfg(dir: &std::path::Path, yaml: &str) -> SubDagConfig {
    SubDagConfig {
        subdag_ref: SubDagRef::Local {
            name: "child".to_string(),
        },
        dag_yaml: yaml.to_string(),
        worker_selector: WorkerSelector(HashMap::new()),
        root_ref: RootRef::new("parent:R"),
        parent_ref: ParentRef::new("parent:P"),
        run_id: RunId::new("C"),
        params: HashMap::new(),
        default_working_dir: None,
        config_path: None,
        working_dir: dir.to_path_buf(),
    }
}

#[tokio::test]
async fn s6_inline_local_dag_is_materialised_then_cleaned_up() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeCoordinator::new());
    fake.set_status(
        &RunId::new("C"),
        &RootRef::new("parent:R"),
        RunStatus {
            is_active: false,
            success: true,
            nodes: vec![],
        },
    );

    // DAGU_EXECUTABLE so the local fork spawns a harmless command.
    std::env::set_var("DAGU_EXECUTABLE", "/bin/true");

    let exec = SubDagExecutor::new(
        local_cfg(dir.path(), "name: child\nsteps: []"),
        vec![],
        no_trace(),
        fake.clone(),
        fake.clone(),
    );

    let result = exec.run(no_cancellation()).await;
    std::env::remove_var("DAGU_EXECUTABLE");

    assert!(result.is_ok());
    let leftover: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("dagu_dag-"))
        .collect();
    assert!(leftover.is_empty());
}

#[tokio::test]
async fn distributed_dispatch_routes_when_worker_selector_is_set() {
    let fake = Arc::new(FakeCoordinator::new());
    let root_ref = RootRef::new("parent:R");
    let run_id = RunId::new("C");
    fake.set_status(
        &run_id,
        &root_ref,
        RunStatus {
            is_active: false,
            success: true,
            nodes: vec![],
        },
    );

    let mut selector = HashMap::new();
    selector.insert("pool".to_string(), "gpu".to_string());

    let cfg = SubDagConfig {
        subdag_ref: SubDagRef::Stored {
            name: "child".to_string(),
        },
        dag_yaml: "name: child".to_string(),
        worker_selector: WorkerSelector(selector),
        root_ref,
        parent_ref: ParentRef::new("parent:P"),
        run_id,
        params: HashMap::new(),
        default_working_dir: None,
        config_path: None,
        working_dir: std::env::temp_dir(),
    };

    let exec = SubDagExecutor::new(cfg, vec![], no_trace(), fake.clone(), fake.clone());
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        exec.run(no_cancellation()),
    )
    .await;
    assert!(result.unwrap().is_ok());
    assert_eq!(fake.dispatched().len(), 1);
}

#[tokio::test]
async fn an_already_cancelled_context_short_circuits_before_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeCoordinator::new());
    let exec = SubDagExecutor::new(
        local_cfg(dir.path(), "name: child\nsteps: []"),
        vec![],
        no_trace(),
        fake.clone(),
        fake.clone(),
    );

    let (tx, rx) = tokio::sync::watch::channel(false);
    tx.send(true).unwrap();

    let result = exec.run(rx).await;
    assert!(matches!(result, Err(ExecError::Cancelled)));
}

#[tokio::test]
async fn kill_is_idempotent_and_is_a_no_op_with_nothing_in_flight() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeCoordinator::new());
    let exec = SubDagExecutor::new(
        local_cfg(dir.path(), "name: child\nsteps: []"),
        vec![],
        no_trace(),
        fake.clone(),
        fake.clone(),
    );

    assert!(exec.kill(Signal::SIGTERM).await.is_ok());
    assert!(exec.kill(Signal::SIGTERM).await.is_ok());
}
