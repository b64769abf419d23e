//! Help output specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .sg()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("names");
}

#[test]
fn run_help_shows_json_flag() {
    let out = Project::empty().sg().args(&["run", "--help"]).passes();
    assert!(predicate::str::contains("--json").eval(out.stdout()));
    assert!(predicate::str::contains("--log-level").eval(out.stdout()));
}
