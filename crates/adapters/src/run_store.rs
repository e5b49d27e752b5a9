// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent run status, keyed by `(child run id, root ref)`. The
//! storage engine itself is out of scope — this crate only defines
//! the read contract the sub-DAG executor polls against.

use async_trait::async_trait;
use thiserror::Error;

use stepexec_core::{RootRef, RunId, RunStatus};

#[derive(Debug, Error)]
pub enum RunStoreError {
    #[error("run not found")]
    NotFound,
    #[error("run store error: {0}")]
    Other(String),
}

#[async_trait]
pub trait RunStore: Send + Sync {
    async fn get_status(
        &self,
        child_run_id: &RunId,
        root_ref: &RootRef,
    ) -> Result<RunStatus, RunStoreError>;
}
