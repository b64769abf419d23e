// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expected deployment names read from startup configuration

use crate::StartupConfig;
use sg_core::{ExpectedNamesSource, ResolveError};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Resolves expected names from the `deployment` tables of a config
#[derive(Clone, Debug)]
pub enum TomlNamesSource {
    /// Already parsed configuration
    Loaded(StartupConfig),
    /// Read the file on every resolve
    File(PathBuf),
}

impl TomlNamesSource {
    pub fn from_config(config: StartupConfig) -> Self {
        Self::Loaded(config)
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }
}

impl ExpectedNamesSource for TomlNamesSource {
    fn resolve_expected_names(&self) -> Result<BTreeSet<String>, ResolveError> {
        let names: BTreeSet<String> = match self {
            Self::Loaded(config) => config.deployment_names().map(str::to_string).collect(),
            Self::File(path) => StartupConfig::load(path)
                .map_err(|e| ResolveError::Unavailable(e.to_string()))?
                .deployment_names()
                .map(str::to_string)
                .collect(),
        };

        if !names.is_empty() {
            tracing::info!(?names, "expecting initial deployments");
        }
        Ok(names)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
