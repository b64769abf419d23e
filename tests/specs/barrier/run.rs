//! `sg run` specs

use crate::prelude::*;

#[test]
fn run_completes_after_initial_deployments() {
    let temp = Project::empty();
    temp.file("startup.toml", TWO_DEPLOYMENTS);

    temp.sg()
        .args(&["run", "startup.toml"])
        .passes()
        .stdout_has("alpha")
        .stdout_has("running")
        .stdout_has("Downstream: deployment.alpha.BUNDLE")
        .stdout_has("file:/bundles/alpha.jar")
        .stdout_has("Startup complete: 0 failed")
        .stderr_has("initial deployments complete");
}

#[test]
fn run_json_summary() {
    let temp = Project::empty();
    temp.file("startup.toml", TWO_DEPLOYMENTS);

    let json = temp
        .sg()
        .args(&["run", "startup.toml", "--json"])
        .passes()
        .stdout_json();

    assert_eq!(json["deployments"].as_array().unwrap().len(), 2);
    assert_eq!(json["failed"], serde_json::json!([]));
    assert_eq!(json["downstream"], serde_json::json!(["deployment.alpha.BUNDLE"]));
    assert_eq!(json["artifacts"][0]["unit"], "deployment.alpha.BUNDLE");
    assert_eq!(json["artifacts"][0]["symbolic_name"], "org.alpha");
}

#[test]
fn failed_install_still_releases_the_barrier() {
    let temp = Project::empty();
    temp.file(
        "startup.toml",
        "[deployment.good]\n[deployment.broken]\nfail = true\n",
    );

    temp.sg()
        .args(&["run", "startup.toml"])
        .passes()
        .stdout_has("start_failed")
        .stdout_has("Startup complete: 1 failed");
}

#[test]
fn empty_config_completes_immediately() {
    let temp = Project::empty();
    temp.file("startup.toml", "");

    temp.sg()
        .args(&["run", "startup.toml"])
        .passes()
        .stdout_has("Downstream: -")
        .stdout_has("Startup complete: 0 failed");
}

#[test]
fn gated_service_waits_for_autoinstall() {
    let temp = Project::empty();
    temp.file(
        "startup.toml",
        "[autoinstall]\ndelay = \"50ms\"\n\n[deployment.a]\n",
    );

    temp.sg()
        .args(&["run", "startup.toml"])
        .passes()
        .stderr_has("auto-install complete")
        .stdout_has("Startup complete");
}

#[test]
fn log_file_receives_logs() {
    let temp = Project::empty();
    temp.file("startup.toml", TWO_DEPLOYMENTS);

    let out = temp
        .sg()
        .args(&["run", "startup.toml", "--log-file", "logs/sg.log"])
        .passes();
    assert!(!out.stderr().contains("initial deployments complete"));

    let logs = std::fs::read_to_string(temp.path().join("logs/sg.log")).unwrap();
    assert!(logs.contains("initial deployments complete"), "{}", logs);
}
