// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-name recognition shared by the handler registry and script
//! materialisation.

/// Unix shells that understand `-e` (errexit) and `-c <string>`.
/// `fish` is deliberately excluded — it rejects `-e`.
pub const KNOWN_UNIX_SHELLS: &[&str] = &["sh", "bash", "zsh", "ksh", "ash", "dash"];

/// Case-fold the basename of a shell program path for handler
/// dispatch, e.g. `C:\Windows\System32\cmd.EXE` -> `cmd.exe`,
/// `/usr/bin/bash` -> `bash`.
pub fn basename_lower(program: &str) -> String {
    program
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(program)
        .to_lowercase()
}

/// `basename_lower` with a trailing `.exe` stripped, for matching
/// Windows executables whether or not the extension was supplied.
pub fn stem_lower(program: &str) -> String {
    let lower = basename_lower(program);
    lower.strip_suffix(".exe").map(str::to_string).unwrap_or(lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        unix_bare = { "bash", "bash" },
        unix_path = { "/usr/bin/bash", "bash" },
        windows_path = { "C:\\Windows\\System32\\cmd.exe", "cmd.exe" },
        mixed_case = { "PowerShell", "powershell" },
    )]
    fn basename_lower_strips_path_and_case(input: &str, expected: &str) {
        assert_eq!(basename_lower(input), expected);
    }

    #[yare::parameterized(
        with_exe = { "cmd.exe", "cmd" },
        without_exe = { "cmd", "cmd" },
        pwsh = { "pwsh.EXE", "pwsh" },
    )]
    fn stem_lower_strips_exe_suffix(input: &str, expected: &str) {
        assert_eq!(stem_lower(input), expected);
    }
}
