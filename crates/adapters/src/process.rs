// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers: process-group isolation at spawn
//! time and process-group signalling.

use tokio::process::Command;

/// Put the child in its own process group so a later [`kill_process_group`]
/// reaches the whole tree, not just the direct child. A no-op on
/// non-Unix targets.
pub fn isolate_process_group(cmd: &mut Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    #[cfg(not(unix))]
    {
        let _ = cmd;
    }
}

/// Send `sig` to the process-group rooted at `pid`. A platform without
/// process-groups would deliver `sig` to `pid` alone; documented as
/// the weaker containment per the design notes.
#[cfg(unix)]
pub fn kill_process_group(pid: i32, sig: nix::sys::signal::Signal) -> std::io::Result<()> {
    nix::sys::signal::killpg(nix::unistd::Pid::from_raw(pid), sig)
        .map_err(|e| std::io::Error::from_raw_os_error(e as i32))
}
