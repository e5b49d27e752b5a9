// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stepexec-engine: the executor registry, single-command executor,
//! multi-command executor, and sub-DAG executor that turn a
//! [`stepexec_core::Step`] into a running process or distributed task.

pub mod command;
pub mod env;
pub mod error;
pub mod executor;
pub mod multi;
pub mod registry;
pub mod subdag;

pub use command::CommandExecutor;
pub use error::ExecError;
pub use executor::{DynWriter, Executor, ExitCodeProvider, NodeStatusProvider};
pub use multi::MultiCommandExecutor;
pub use registry::{ExecutorRegistry, ExecutorRegistryBuilder};
pub use subdag::{SubDagConfig, SubDagExecutor};
