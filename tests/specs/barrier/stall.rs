//! Stall handling specs

use crate::prelude::*;

const STUCK: &str = r#"
[barrier]
stall_timeout = "100ms"
on_stall = "release"

[deployment.quick]
artifact = { location = "quick.jar" }

[deployment.stuck]
start_delay = "1h"
"#;

#[test]
fn release_policy_closes_stalled_barrier() {
    let temp = Project::empty();
    temp.file("startup.toml", STUCK);

    temp.sg()
        .args(&["run", "startup.toml"])
        .passes()
        .stdout_has("Released with outstanding: deployment.stuck.INSTALL")
        .stdout_has("quick.jar")
        .stderr_has("initial deployments stalled");
}

#[test]
fn release_is_reported_in_json() {
    let temp = Project::empty();
    temp.file("startup.toml", STUCK);

    let json = temp
        .sg()
        .args(&["run", "startup.toml", "--json"])
        .passes()
        .stdout_json();
    assert_eq!(
        json["released"],
        serde_json::json!(["deployment.stuck.INSTALL"])
    );
}
