// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Barrier options and well-known unit names

use serde::{Deserialize, Serialize};
use sg_core::UnitName;
use std::time::Duration;

/// What to do when the barrier is still open after `stall_timeout`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallPolicy {
    /// Keep waiting, warning once per interval
    #[default]
    Wait,
    /// Close the barrier as if the outstanding units had finished
    Release,
}

/// `[barrier]` section
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BarrierConfig {
    /// No stall handling when unset
    #[serde(default, with = "humantime_serde")]
    pub stall_timeout: Option<Duration>,
    #[serde(default)]
    pub on_stall: StallPolicy,
    #[serde(default)]
    pub names: BarrierNames,
}

impl BarrierConfig {
    pub fn with_stall_timeout(mut self, timeout: Duration, policy: StallPolicy) -> Self {
        self.stall_timeout = Some(timeout);
        self.on_stall = policy;
        self
    }
}

/// Names of the marker and gated units installed by an episode
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarrierNames {
    /// Installed when every initial deployment has finished installing
    pub initial_complete: UnitName,
    /// External gate the gated service also waits for
    pub autoinstall_complete: UnitName,
    pub gated_service: UnitName,
    /// Installed by the gated service as its child
    pub gated_complete: UnitName,
}

impl Default for BarrierNames {
    fn default() -> Self {
        let base = UnitName::root("startgate");
        let artifacts = base.append("persistent").append("artifacts");
        Self {
            initial_complete: base
                .append("initial")
                .append("deployments")
                .append("COMPLETE"),
            autoinstall_complete: base.append("autoinstall").append("COMPLETE"),
            gated_complete: artifacts.append("COMPLETE"),
            gated_service: artifacts,
        }
    }
}

impl BarrierNames {
    pub fn all(&self) -> [&UnitName; 4] {
        [
            &self.initial_complete,
            &self.autoinstall_complete,
            &self.gated_service,
            &self.gated_complete,
        ]
    }
}

#[cfg(test)]
#[path = "barrier_tests.rs"]
mod tests;
