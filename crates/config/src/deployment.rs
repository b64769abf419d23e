// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment and auto-install sections

use serde::{Deserialize, Serialize};
use sg_core::Artifact;
use std::time::Duration;

/// A `[deployment.<name>]` table.
///
/// The table key is what the barrier waits for. The remaining fields drive
/// the simulated install phase run by `sg run`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// How long the install phase takes
    #[serde(default, with = "humantime_serde")]
    pub start_delay: Option<Duration>,
    /// Install phase fails instead of reaching running
    #[serde(default)]
    pub fail: bool,
    /// Artifact recorded with the barrier during install
    #[serde(default)]
    pub artifact: Option<Artifact>,
}

/// `[autoinstall]` section
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutoinstallConfig {
    /// Delay before the auto-install gate is installed
    #[serde(default, with = "humantime_serde")]
    pub delay: Option<Duration>,
}
