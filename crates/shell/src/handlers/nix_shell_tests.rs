// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

fn base_ctx<'a>() -> BuildContext<'a> {
    BuildContext {
        dir: Path::new("."),
        command: "",
        args: &[],
        script_path: None,
        shell: Some("nix-shell"),
        shell_args: &[],
        shell_command: None,
        shell_packages: &[],
        user_specified_shell: false,
    }
}

#[test]
fn s4_shell_command_string_prefixed_with_set_e() {
    let mut ctx = base_ctx();
    let packages = vec!["bash".to_string(), "coreutils".to_string()];
    ctx.shell_packages = &packages;
    ctx.shell_command = Some("echo hi");
    let built = NixShellHandler.build(&ctx).unwrap();
    assert_eq!(
        built.args,
        vec![
            "-p".to_string(),
            "bash".to_string(),
            "-p".to_string(),
            "coreutils".to_string(),
            "--pure".to_string(),
            "--run".to_string(),
            "set -e; echo hi".to_string(),
        ]
    );
}

#[test]
fn does_not_double_prefix_existing_set_e() {
    let mut ctx = base_ctx();
    ctx.shell_command = Some("set -e; echo hi");
    let built = NixShellHandler.build(&ctx).unwrap();
    assert_eq!(built.args.last().unwrap(), "set -e; echo hi");
}

#[test]
fn skips_prefix_when_shell_explicitly_chosen() {
    let mut ctx = base_ctx();
    ctx.shell_command = Some("echo hi");
    ctx.user_specified_shell = true;
    let built = NixShellHandler.build(&ctx).unwrap();
    assert_eq!(built.args.last().unwrap(), "echo hi");
}

#[test]
fn command_and_args_are_joined_by_spaces() {
    let mut ctx = base_ctx();
    ctx.command = "echo";
    let args = vec!["hi".to_string(), "there".to_string()];
    ctx.args = &args;
    let built = NixShellHandler.build(&ctx).unwrap();
    assert_eq!(built.args.last().unwrap(), "set -e; echo hi there");
}
