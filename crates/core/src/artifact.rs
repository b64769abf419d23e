// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifacts recorded while a startup barrier is open

use crate::name::UnitName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Artifacts keyed by the unit that installed them, in recording order
pub type ArtifactMap = IndexMap<UnitName, Artifact>;

/// An installed deployment artifact
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Where the artifact was installed from
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbolic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_level: Option<u32>,
    /// Start the artifact once installed
    #[serde(default)]
    pub autostart: bool,
}

impl Artifact {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            symbolic_name: None,
            version: None,
            start_level: None,
            autostart: false,
        }
    }

    pub fn with_symbolic_name(mut self, name: impl Into<String>) -> Self {
        self.symbolic_name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_start_level(mut self, level: u32) -> Self {
        self.start_level = Some(level);
        self
    }

    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }
}
