// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit-code extraction shared by the command and sub-DAG executors.

/// Derive the exit code the scheduler should observe for a completed
/// (or failed-to-start) child process.
///
/// - `Ok(())` → 0.
/// - A process that ran and exited non-zero → that code.
/// - A process killed by signal, or any other I/O-level failure (spawn
///   refused, etc.) → 1.
pub fn from_exit_status(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Exit code to surface when the OS refused to even start the process.
pub const START_FAILURE_EXIT_CODE: i32 = 1;

/// Exit code to surface for any error that isn't a clean process exit
/// (used as the fallback by [`from_exit_status`]'s callers when only an
/// `io::Error` is available, never a `ExitStatus`).
pub const UNKNOWN_FAILURE_EXIT_CODE: i32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn exit_code_zero_on_success() {
        let status = std::process::ExitStatus::from_raw(0);
        assert_eq!(from_exit_status(status), 0);
    }

    #[yare::parameterized(
        one = { 1 },
        two = { 2 },
        max = { 255 },
    )]
    fn exit_code_matches_shell_exit(code: i32) {
        // Shifted into the wait(2) encoding: low byte holds the exit code.
        let status = std::process::ExitStatus::from_raw(code << 8);
        assert_eq!(from_exit_status(status), code);
    }

    #[test]
    fn killed_by_signal_has_no_code() {
        // SIGKILL, no exit code bits set.
        let status = std::process::ExitStatus::from_raw(9);
        assert_eq!(from_exit_status(status), UNKNOWN_FAILURE_EXIT_CODE);
    }
}
