// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`SubDagExecutor`]: chooses the local-fork or distributed-dispatch
//! path per target (§4.5), and implements the "Fan-in Kill" semantics
//! shared by both.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use nix::sys::signal::Signal;
use opentelemetry::Context;
use parking_lot::Mutex;
use tokio::process::Child;
use tokio::sync::watch;

use stepexec_adapters::process::{isolate_process_group, kill_process_group};
use stepexec_adapters::{CoordinatorClient, RunStore};
use stepexec_core::{NodeStatus, ParentRef, RootRef, RunId, RunStatus, SubDagRef, Task, WorkerSelector};

use crate::env::collate_with_process_env;
use crate::error::ExecError;
use crate::executor::{CancelSignal, DynWriter, Executor, NodeStatusProvider};
use crate::subdag::{distributed, local};

/// Everything the caller (the registry factory) has already resolved
/// for one sub-DAG step run: the inline/stored target, identity, and
/// routing.
pub struct SubDagConfig {
    pub subdag_ref: SubDagRef,
    pub dag_yaml: String,
    pub worker_selector: WorkerSelector,
    pub root_ref: RootRef,
    pub parent_ref: ParentRef,
    pub run_id: RunId,
    pub params: HashMap<String, String>,
    pub default_working_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub working_dir: PathBuf,
}

struct State {
    local_children: HashMap<RunId, Arc<tokio::sync::Mutex<Child>>>,
    distributed_children: HashSet<RunId>,
    temp_dag: Option<local::TempDagFile>,
}

pub struct SubDagExecutor {
    cfg: SubDagConfig,
    dag_env: Vec<(String, String)>,
    trace_cx: Context,
    coordinator: Arc<dyn CoordinatorClient>,
    store: Arc<dyn RunStore>,
    state: Mutex<State>,
    killed_tx: watch::Sender<bool>,
    killed_rx: Mutex<watch::Receiver<bool>>,
    close_guard: Mutex<bool>,
    last_status: Mutex<Option<RunStatus>>,
}

impl SubDagExecutor {
    pub fn new(
        cfg: SubDagConfig,
        dag_env: Vec<(String, String)>,
        trace_cx: Context,
        coordinator: Arc<dyn CoordinatorClient>,
        store: Arc<dyn RunStore>,
    ) -> Self {
        let (killed_tx, killed_rx) = watch::channel(false);
        Self {
            cfg,
            dag_env,
            trace_cx,
            coordinator,
            store,
            state: Mutex::new(State {
                local_children: HashMap::new(),
                distributed_children: HashSet::new(),
                temp_dag: None,
            }),
            killed_tx,
            killed_rx: Mutex::new(killed_rx),
            close_guard: Mutex::new(false),
            last_status: Mutex::new(None),
        }
    }

    fn dag_name(&self) -> &str {
        match &self.cfg.subdag_ref {
            SubDagRef::Local { name } => name,
            SubDagRef::Stored { name } => name,
        }
    }

    async fn resolve_dag_path(&self) -> Result<PathBuf, ExecError> {
        match &self.cfg.subdag_ref {
            SubDagRef::Local { name } => {
                let materialized = local::materialize_inline_dag(
                    &self.cfg.working_dir,
                    name,
                    &self.cfg.dag_yaml,
                )
                .map_err(|e| ExecError::Setup(format!("failed to materialise sub-DAG: {e}")))?;
                let path = materialized.path().to_path_buf();
                self.state.lock().temp_dag = Some(materialized);
                Ok(path)
            }
            SubDagRef::Stored { name } => Ok(PathBuf::from(name)),
        }
    }

    async fn run_local(&self) -> Result<RunStatus, ExecError> {
        let dag_path = self.resolve_dag_path().await?;
        let self_exe = local::self_executable()
            .map_err(|e| ExecError::Setup(format!("failed to locate self executable: {e}")))?;

        let params = if self.cfg.params.is_empty() {
            None
        } else {
            Some(
                self.cfg
                    .params
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        };

        let argv = local::build_argv(
            &self_exe,
            &self.cfg.root_ref,
            &self.cfg.parent_ref,
            &self.cfg.run_id,
            self.cfg.default_working_dir.as_deref(),
            self.cfg.config_path.as_deref(),
            &dag_path,
            params.as_deref(),
        );

        let env = collate_with_process_env(&self.dag_env, &[], &self.trace_cx);
        let mut cmd = tokio::process::Command::new(&argv[0]);
        cmd.args(&argv[1..]).envs(env);
        cmd.stdout(std::process::Stdio::null());
        cmd.stderr(std::process::Stdio::null());
        isolate_process_group(&mut cmd);

        let child = cmd.spawn().map_err(|e| ExecError::Start {
            source: e,
            tail: String::new(),
        })?;
        let handle = Arc::new(tokio::sync::Mutex::new(child));
        self.state
            .lock()
            .local_children
            .insert(self.cfg.run_id.clone(), Arc::clone(&handle));

        let wait_result = handle.lock().await.wait().await;
        self.state.lock().local_children.remove(&self.cfg.run_id);

        // A successful wait short-circuits before consulting `killed`:
        // a cancellation that races with the child exiting cleanly is
        // resolved in favour of the completed status (§5), so `killed`
        // only turns a *failed* wait into a distinguished cancellation.
        if let Err(e) = wait_result {
            if *self.killed_rx.lock().borrow() {
                return Err(ExecError::Cancelled);
            }
            return Err(ExecError::Start {
                source: e,
                tail: String::new(),
            });
        }

        // A success status shadows a non-zero exit: the child may
        // have recorded partial results and the status is authoritative.
        self.store
            .get_status(&self.cfg.run_id, &self.cfg.root_ref)
            .await
            .map_err(|e| ExecError::SubDag(format!("failed to read child status: {e}")))
    }

    async fn run_distributed(&self) -> Result<RunStatus, ExecError> {
        let task = Task {
            dag_name: self.dag_name().to_string(),
            dag_yaml: self.cfg.dag_yaml.clone(),
            operation: stepexec_core::Operation::Start,
            child_run_id: self.cfg.run_id.clone(),
            root_ref: self.cfg.root_ref.clone(),
            parent_ref: self.cfg.parent_ref.clone(),
            params: self.cfg.params.clone(),
            worker_selector: self.cfg.worker_selector.clone(),
        };
        self.state
            .lock()
            .distributed_children
            .insert(self.cfg.run_id.clone());

        let mut killed_rx = self.killed_rx.lock().clone();
        let result = distributed::dispatch_and_wait(
            self.coordinator.as_ref(),
            self.store.as_ref(),
            &task,
            &mut killed_rx,
        )
        .await;

        self.state
            .lock()
            .distributed_children
            .remove(&self.cfg.run_id);
        result
    }
}

#[async_trait]
impl Executor for SubDagExecutor {
    // Streams are not forwarded: the child DAG's own logging captures
    // its stdout/stderr (local path), and the distributed path has no
    // direct stream at all.
    fn set_stdout(&self, _writer: DynWriter) {}
    fn set_stderr(&self, _writer: DynWriter) {}

    async fn run(&self, mut cancel: CancelSignal) -> Result<(), ExecError> {
        let dispatch = async {
            if self.cfg.worker_selector.is_empty() {
                self.run_local().await
            } else {
                self.run_distributed().await
            }
        };
        let wait_cancelled = async {
            loop {
                if cancel.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
                if *cancel.borrow() {
                    return;
                }
            }
        };

        let result = tokio::select! {
            result = dispatch => result,
            () = wait_cancelled => {
                let _ = self.kill(Signal::SIGTERM).await;
                Err(ExecError::Cancelled)
            }
        };

        if let Some(temp_dag) = &self.state.lock().temp_dag {
            let _ = temp_dag.cleanup();
        }

        match result {
            Ok(status) => {
                *self.last_status.lock() = Some(status.clone());
                if status.success {
                    Ok(())
                } else {
                    Err(ExecError::SubDag(format!(
                        "sub-DAG '{}' did not succeed",
                        self.dag_name()
                    )))
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn kill(&self, sig: Signal) -> Result<(), ExecError> {
        let already_closed = {
            let mut guard = self.close_guard.lock();
            let was = *guard;
            *guard = true;
            was
        };

        let (distributed_children, local_children) = {
            let state = self.state.lock();
            (
                state.distributed_children.iter().cloned().collect::<Vec<_>>(),
                state.local_children.values().cloned().collect::<Vec<_>>(),
            )
        };

        let mut first_error = None;

        for child_run_id in distributed_children {
            if let Err(e) = distributed::request_cancel(
                self.coordinator.as_ref(),
                &child_run_id,
                &self.cfg.root_ref,
            )
            .await
            {
                first_error.get_or_insert(e);
            }
        }

        for child in local_children {
            if let Some(pid) = child.lock().await.id() {
                if let Err(e) = kill_process_group(pid as i32, sig) {
                    first_error.get_or_insert(ExecError::Setup(format!(
                        "failed to signal sub-DAG child: {e}"
                    )));
                }
            }
        }

        if !already_closed {
            let _ = self.killed_tx.send(true);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl NodeStatusProvider for SubDagExecutor {
    fn node_status(&self) -> NodeStatus {
        match self.last_status.lock().as_ref() {
            Some(status) if status.success => NodeStatus::Succeeded,
            Some(_) => NodeStatus::Failed,
            None => NodeStatus::Failed,
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
