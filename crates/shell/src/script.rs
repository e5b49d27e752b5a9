// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script-body materialisation to a temp file in the step's working
//! directory. The file is always the caller's responsibility to
//! delete — see [`MaterializedScript::drop`] for the cleanup-on-every-
//! exit-path guarantee.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::shells::stem_lower;

/// A script file materialised on disk, deleted when dropped.
///
/// Every exit path of a command executor's `Run` — success, failure,
/// or early return on a setup error — drops this value, so the
/// deletion happens unconditionally via `Drop` rather than being
/// threaded through each return point by hand.
pub struct MaterializedScript {
    path: PathBuf,
}

impl MaterializedScript {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MaterializedScript {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Extension to give the temp file, derived from the shell's
/// case-folded basename.
fn extension_for_shell(shell: Option<&str>) -> &'static str {
    match shell.map(stem_lower).as_deref() {
        Some("powershell") | Some("pwsh") => ".ps1",
        Some("sh") | Some("bash") | Some("zsh") | Some("ksh") | Some("ash") | Some("dash") => {
            ".sh"
        }
        _ => "",
    }
}

/// Shell-specific preprocessing applied to the script body before
/// writing it to disk.
fn preprocess(shell: Option<&str>, body: &str) -> String {
    match shell.map(stem_lower).as_deref() {
        Some("powershell") | Some("pwsh") => format!(
            "$ErrorActionPreference = 'Stop'\n$PSNativeCommandUseErrorActionPreference = $true\n{body}"
        ),
        _ => body.to_string(),
    }
}

/// Write `body` to a new `dagu_script-*<ext>` file under `dir`, mode
/// `0750`, and return a handle that deletes it on drop.
pub fn materialize(dir: &Path, shell: Option<&str>, body: &str) -> std::io::Result<MaterializedScript> {
    std::fs::create_dir_all(dir)?;
    let ext = extension_for_shell(shell);
    let mut file = tempfile::Builder::new()
        .prefix("dagu_script-")
        .suffix(ext)
        .tempfile_in(dir)?;
    let content = preprocess(shell, body);
    file.write_all(content.as_bytes())?;
    file.flush()?;
    let path = file.into_temp_path();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o750))?;
    }

    let path = path.keep().map_err(|e| e.error)?;
    Ok(MaterializedScript { path })
}
