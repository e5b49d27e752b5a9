// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

fn ctx<'a>(command: &'a str, args: &'a [String], script: Option<&'a Path>) -> BuildContext<'a> {
    BuildContext {
        dir: Path::new("."),
        command,
        args,
        script_path: script,
        shell: None,
        shell_args: &[],
        shell_command: None,
        shell_packages: &[],
        user_specified_shell: false,
    }
}

#[test]
fn command_with_args_builds_verbatim() {
    let args = vec!["hello".to_string()];
    let built = DirectHandler.build(&ctx("echo", &args, None)).unwrap();
    assert_eq!(built.program, "echo");
    assert_eq!(built.args, vec!["hello".to_string()]);
}

#[test]
fn appends_script_path_as_final_arg() {
    let args = vec!["-f".to_string()];
    let script = Path::new("/tmp/dagu_script-abc.sh");
    let built = DirectHandler.build(&ctx("interp", &args, Some(script))).unwrap();
    assert_eq!(
        built.args,
        vec!["-f".to_string(), "/tmp/dagu_script-abc.sh".to_string()]
    );
}

#[test]
fn rejects_bare_shell_command_string() {
    let mut c = ctx("", &[], None);
    c.shell_command = Some("echo hi");
    assert_eq!(
        DirectHandler.build(&c).unwrap_err(),
        stepexec_core::ConfigError::DirectShellNeedsArgv
    );
}

#[test]
fn rejects_nothing_at_all() {
    let c = ctx("", &[], None);
    assert_eq!(
        DirectHandler.build(&c).unwrap_err(),
        stepexec_core::ConfigError::NoCommandOrScript
    );
}
