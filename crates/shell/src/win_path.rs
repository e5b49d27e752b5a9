// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows script-path normalisation.
//!
//! PowerShell and cmd.exe, invoked programmatically, do not search the
//! current directory for the executable named by the first token of a
//! command string. If that token names a batch/PowerShell script that
//! exists in the step's working directory, prefix it with `.\` to
//! restore the intuitive "run the script next to me" behaviour — without
//! silently prefixing arbitrary commands that happen to share a name
//! with a file.

use std::path::Path;

const PREFIXABLE_EXTENSIONS: &[&str] = &[".bat", ".cmd", ".ps1"];

/// Normalise `cmd_string` for the current target. Identity on
/// non-Windows builds.
pub fn normalize(cmd_string: &str, dir: &Path) -> String {
    #[cfg(windows)]
    {
        normalize_inner(cmd_string, dir)
    }
    #[cfg(not(windows))]
    {
        let _ = dir;
        cmd_string.to_string()
    }
}

/// The pure prefixing logic, independent of target OS so it can be unit
/// tested on any host.
fn normalize_inner(cmd_string: &str, dir: &Path) -> String {
    let leading_ws = cmd_string.len() - cmd_string.trim_start().len();
    let rest = &cmd_string[leading_ws..];
    let tok_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let token = &rest[..tok_len];

    let has_path_separator = token.contains('/') || token.contains('\\');
    let has_prefixable_extension = {
        let lower = token.to_lowercase();
        PREFIXABLE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    };
    let exists_in_dir = dir.join(token).is_file();

    if !has_path_separator && has_prefixable_extension && exists_in_dir {
        format!("{}.\\{}{}", &cmd_string[..leading_ws], token, &rest[tok_len..])
    } else {
        cmd_string.to_string()
    }
}
