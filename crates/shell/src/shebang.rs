// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shebang detection for `shell + script` steps: if the script starts
//! with `#!interpreter args`, the interpreter is invoked directly
//! instead of going through the configured shell.
//!
//! Parsing the interpreter-argument syntax itself (e.g.
//! `#!/usr/bin/env -S bash -e`) is out of scope for this core; callers
//! get back the raw line and decide how to tokenize it.

use std::io::Read;
use std::path::Path;

/// Maximum number of bytes read while looking for the first newline.
pub const PEEK_LIMIT: usize = 4096;

/// Read the first line of `path`, up to [`PEEK_LIMIT`] bytes.
///
/// Returns the line without its trailing newline. An empty file yields
/// an empty string, not an error. A first line longer than the limit
/// (no newline found within it) is an error.
pub fn peek_first_line(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = file.read(&mut byte)?;
        if n == 0 || byte[0] == b'\n' {
            break;
        }
        buf.push(byte[0]);
        if buf.len() > PEEK_LIMIT {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("first line exceeds {PEEK_LIMIT}-byte shebang peek limit"),
            ));
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Whether a peeked line is a shebang.
pub fn is_shebang(line: &str) -> bool {
    line.starts_with("#!")
}

/// Split a shebang line into its interpreter and argv.
///
/// This is deliberately a bare whitespace split, not a full
/// `#!/usr/bin/env -S ...` parser — that syntax belongs to a shared
/// external utility, not this core.
pub fn shebang_interpreter(line: &str) -> Option<(String, Vec<String>)> {
    let rest = line.strip_prefix("#!")?.trim();
    let mut parts = rest.split_whitespace();
    let interpreter = parts.next()?.to_string();
    let args = parts.map(str::to_string).collect();
    Some((interpreter, args))
}
