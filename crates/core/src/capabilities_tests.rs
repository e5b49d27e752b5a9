// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::step::{SubDagRef, WorkerSelector};
use crate::StepName;

fn dummy_step() -> Step {
    Step {
        name: StepName::new("s"),
        commands: vec![],
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
fn command_like_honours_everything_but_llm() {
    let caps = ExecutorCapabilities::command_like();
    assert!(caps.command && caps.multiple_commands && caps.script && caps.shell);
    assert!(!caps.llm);
}

#[test]
fn subdag_honours_nothing_shell_related() {
    let caps = ExecutorCapabilities::subdag();
    assert!(!caps.command && !caps.multiple_commands && !caps.script && !caps.shell);
}

#[test]
fn eval_options_default_when_no_hook() {
    let caps = ExecutorCapabilities::command_like();
    assert_eq!(caps.eval_options_for(&dummy_step()), EvalOptions::default());
}

#[test]
fn eval_options_uses_registered_hook() {
    fn hook(_: &Step) -> EvalOptions {
        EvalOptions {
            expand_env_before_eval: true,
        }
    }
    let caps = ExecutorCapabilities {
        eval_options: Some(hook),
        ..ExecutorCapabilities::command_like()
    };
    assert!(caps.eval_options_for(&dummy_step()).expand_env_before_eval);
}

#[test]
fn subdag_ref_variants_round_trip_through_json() {
    let local = SubDagRef::Local {
        name: "child".into(),
    };
    let json = serde_json::to_string(&local).unwrap();
    let back: SubDagRef = serde_json::from_str(&json).unwrap();
    assert_eq!(local, back);
}
