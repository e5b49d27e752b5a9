// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local-fork dispatch path (§4.5 "Local path"): self-exec the
//! current binary in `start` mode against a materialised or
//! already-stored DAG file.

use std::path::{Path, PathBuf};

use stepexec_core::{ParentRef, RootRef, RunId};

/// The default self-executable, honouring the `DAGU_EXECUTABLE`
/// override (§6 "Environment variables consumed by the runtime").
pub fn self_executable() -> std::io::Result<String> {
    if let Ok(path) = std::env::var("DAGU_EXECUTABLE") {
        return Ok(path);
    }
    std::env::current_exe().map(|p| p.to_string_lossy().into_owned())
}

/// Build the argv the sub-DAG executor forks against its own binary
/// (§6 "Child process CLI contract").
#[allow(clippy::too_many_arguments)]
pub fn build_argv(
    self_exe: &str,
    root_ref: &RootRef,
    parent_ref: &ParentRef,
    run_id: &RunId,
    default_working_dir: Option<&Path>,
    config_path: Option<&Path>,
    dag_path: &Path,
    params: Option<&str>,
) -> Vec<String> {
    let mut argv = vec![
        self_exe.to_string(),
        "start".to_string(),
        format!("--root={root_ref}"),
        format!("--parent={parent_ref}"),
        format!("--run-id={run_id}"),
    ];
    if let Some(dir) = default_working_dir {
        argv.push(format!("--default-working-dir={}", dir.display()));
    }
    if let Some(cfg) = config_path {
        argv.push("--config".to_string());
        argv.push(cfg.display().to_string());
    }
    argv.push(dag_path.display().to_string());
    if let Some(params) = params {
        argv.push("--".to_string());
        argv.push(params.to_string());
    }
    argv
}

/// Materialise an inline sub-DAG's YAML to a temp file in `dir`, named
/// so the child DAG's name is recoverable from the path for debugging.
/// Cleanup is explicit (§4.5 "Temp-file cleanup"), not drop-based: the
/// caller controls when the file disappears relative to `Cleanup`.
pub struct TempDagFile {
    path: PathBuf,
}

impl TempDagFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the temp file, tolerating "not found" for idempotence.
    pub fn cleanup(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

pub fn materialize_inline_dag(
    dir: &Path,
    name: &str,
    yaml: &str,
) -> std::io::Result<TempDagFile> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("dagu_dag-{name}-"))
        .suffix(".yaml")
        .tempfile_in(dir)?;
    use std::io::Write;
    file.write_all(yaml.as_bytes())?;
    file.flush()?;
    let path = file.into_temp_path().keep().map_err(|e| e.error)?;
    Ok(TempDagFile { path })
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
