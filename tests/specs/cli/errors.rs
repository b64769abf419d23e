//! Error reporting specs

use crate::prelude::*;

#[test]
fn missing_config_is_reported() {
    Project::empty()
        .sg()
        .args(&["run", "missing.toml"])
        .fails()
        .stderr_has("cannot read config 'missing.toml'")
        .stderr_has("suggestions:");
}

#[test]
fn unknown_field_is_rejected() {
    let temp = Project::empty();
    temp.file("startup.toml", "[deployment.a]\nstart_dealy = \"1s\"\n");

    temp.sg()
        .args(&["names", "startup.toml"])
        .fails()
        .stderr_has("invalid config 'startup.toml'")
        .stderr_has("start_dealy");
}

#[test]
fn bad_duration_is_rejected() {
    let temp = Project::empty();
    temp.file("startup.toml", "[barrier]\nstall_timeout = \"soon\"\n");

    temp.sg()
        .args(&["run", "startup.toml"])
        .fails()
        .stderr_has("invalid config");
}

#[test]
fn invalid_log_level_is_rejected() {
    let temp = Project::empty();
    temp.file("startup.toml", "");

    temp.sg()
        .args(&["--log-level", "sg=notalevel", "names", "startup.toml"])
        .fails()
        .stderr_has("invalid log level");
}
