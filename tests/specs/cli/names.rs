//! `sg names` specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn names_prints_sorted_deployments() {
    let temp = Project::empty();
    temp.file(
        "startup.toml",
        "[deployment.zeta]\n[deployment.alpha]\n[deployment.\"web.war\"]\n",
    );

    let out = temp.sg().args(&["names", "startup.toml"]).passes();
    assert_eq!(out.stdout(), "alpha\nweb.war\nzeta\n");
}

#[test]
fn names_json_is_an_array() {
    let temp = Project::empty();
    temp.file("startup.toml", TWO_DEPLOYMENTS);

    let json = temp
        .sg()
        .args(&["names", "startup.toml", "--json"])
        .passes()
        .stdout_json();
    assert_eq!(json, serde_json::json!(["alpha", "beta"]));
}

#[test]
fn empty_config_has_no_names() {
    let temp = Project::empty();
    temp.file("startup.toml", "");

    let out = temp.sg().args(&["names", "startup.toml"]).passes();
    assert_eq!(out.stdout(), "");
}
