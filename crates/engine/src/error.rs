// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the startup barrier

use sg_core::{RegistryError, ResolveError};
use thiserror::Error;

/// Errors creating a tracker
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("failed to subscribe to registry: {0}")]
    Subscribe(#[source] RegistryError),
    #[error("failed to install completion marker: {0}")]
    Install(#[source] RegistryError),
}

/// Errors starting an episode
#[derive(Debug, Error)]
pub enum EpisodeError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("failed to install gated service: {0}")]
    Install(#[from] RegistryError),
    #[error("stall watchdog needs a tokio runtime: {0}")]
    NoRuntime(String),
}
