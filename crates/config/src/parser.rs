// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup configuration TOML parsing

use crate::{AutoinstallConfig, BarrierConfig, DeploymentConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// A parsed startup configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StartupConfig {
    #[serde(default)]
    pub barrier: BarrierConfig,
    #[serde(default)]
    pub autoinstall: AutoinstallConfig,
    /// Persisted deployments in file order
    #[serde(default, rename = "deployment")]
    pub deployments: IndexMap<String, DeploymentConfig>,
}

impl StartupConfig {
    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config(&content)
    }

    /// Get a deployment definition by name
    pub fn get_deployment(&self, name: &str) -> Option<&DeploymentConfig> {
        self.deployments.get(name)
    }

    pub fn deployment_names(&self) -> impl Iterator<Item = &str> {
        self.deployments.keys().map(String::as_str)
    }
}

/// Parse a startup configuration from TOML content
pub fn parse_config(content: &str) -> Result<StartupConfig, ConfigError> {
    let config: StartupConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &StartupConfig) -> Result<(), ConfigError> {
    if config.barrier.stall_timeout.is_some_and(|t| t.is_zero()) {
        return Err(ConfigError::InvalidFormat(
            "barrier.stall_timeout must be greater than zero".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in config.barrier.names.all() {
        if !seen.insert(name) {
            return Err(ConfigError::InvalidFormat(format!(
                "barrier.names: {} is used more than once",
                name
            )));
        }
    }

    if config.deployments.keys().any(|name| name.is_empty()) {
        return Err(ConfigError::InvalidFormat(
            "deployment names must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
