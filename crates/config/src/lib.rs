// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Startup configuration parsing

mod barrier;
mod deployment;
mod parser;
mod resolver;

pub use barrier::{BarrierConfig, BarrierNames, StallPolicy};
pub use deployment::{AutoinstallConfig, DeploymentConfig};
pub use parser::{parse_config, ConfigError, StartupConfig};
pub use resolver::TomlNamesSource;
