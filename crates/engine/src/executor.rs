// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The executor interface consumed by the (out-of-scope) scheduler
//! (§6).

use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tokio::sync::watch;

use crate::error::ExecError;

/// Type-erased async sink, since different executors wrap stdout with
/// different writers (a plain file, a `TailWriter`, a pipe to a
/// multi-command's next stage).
pub type DynWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// The caller's cancellation context (spec's `ctx`), threaded into
/// `Run` alongside the explicit `Kill(signal)` path. A `true` value
/// observed on this channel means the caller's context has ended;
/// executors that run more than one child (multi-command, sub-DAG)
/// check it between steps and short-circuit with `ExecError::Cancelled`.
pub type CancelSignal = watch::Receiver<bool>;

/// A `CancelSignal` that never fires, for callers with no external
/// cancellation context to thread through.
pub fn no_cancellation() -> CancelSignal {
    watch::channel(false).1
}

/// Every step's executor, from single-shell commands to sub-DAGs,
/// implements this. `Run` executes exactly once; `Kill` is callable
/// concurrently and must be idempotent.
///
/// `run`/`kill` both take `&self`, not `&mut self`: a `Kill` issued
/// from another thread must be able to reach the executor while `run`
/// is in flight, so mutable state (the child handle, the exit code,
/// the writers) lives behind interior mutability rather than an
/// exclusive borrow.
#[async_trait]
pub trait Executor: Send + Sync {
    fn set_stdout(&self, writer: DynWriter);
    fn set_stderr(&self, writer: DynWriter);

    async fn run(&self, cancel: CancelSignal) -> Result<(), ExecError>;

    async fn kill(&self, sig: nix::sys::signal::Signal) -> Result<(), ExecError>;
}

/// Implemented by command-like executors; not every executor reports
/// a numeric exit code (e.g. an approval-wait executor).
pub trait ExitCodeProvider {
    fn exit_code(&self) -> i32;
}

/// Implemented by executors that can report a status beyond plain
/// success/failure, e.g. a distinguished `Waiting` state.
pub trait NodeStatusProvider {
    fn node_status(&self) -> stepexec_core::NodeStatus;
}
