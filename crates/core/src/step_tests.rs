// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn step(commands: Vec<CommandSpec>) -> Step {
    Step {
        name: StepName::new("s"),
        commands,
        script: None,
        shell: None,
        shell_packages: vec![],
        dir: None,
        executor_type: String::new(),
        executor_config: serde_json::Value::Null,
        depends: vec![],
        subdag: None,
        worker_selector: WorkerSelector::default(),
    }
}

#[test]
fn single_command_returns_none_when_empty() {
    assert!(step(vec![]).single_command().is_none());
}

#[test]
fn single_command_returns_none_when_multiple() {
    let cmds = vec![
        CommandSpec {
            command: "true".into(),
            args: vec![],
            command_with_args: None,
        },
        CommandSpec {
            command: "false".into(),
            args: vec![],
            command_with_args: None,
        },
    ];
    assert!(step(cmds.clone()).single_command().is_none());
    assert!(step(cmds).has_multiple_commands());
}

#[test]
fn single_command_returns_the_one_entry() {
    let cmd = CommandSpec {
        command: "echo".into(),
        args: vec!["hi".into()],
        command_with_args: None,
    };
    let s = step(vec![cmd.clone()]);
    assert_eq!(s.single_command(), Some(&cmd));
    assert!(!s.has_multiple_commands());
}

#[test]
fn worker_selector_empty_means_local() {
    assert!(WorkerSelector::default().is_empty());
    let mut sel = WorkerSelector::default();
    sel.0.insert("region".into(), "us".into());
    assert!(!sel.is_empty());
}
