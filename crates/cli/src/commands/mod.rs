// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod names;
pub mod run;

use crate::error::CliError;
use sg_config::StartupConfig;
use std::path::Path;

fn load_config(path: &Path) -> Result<StartupConfig, CliError> {
    StartupConfig::load(path).map_err(|e| CliError::config(path, e))
}
