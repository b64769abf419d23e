// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service held back until the initial deployments are complete

use crate::gate::CompletionMarker;
use crate::tracker::PendingSetTracker;
use async_trait::async_trait;
use sg_config::BarrierNames;
use sg_core::{
    Registry, RegistryError, Service, StartContext, StartError, StopContext, UnitName, UnitSpec,
};
use std::any::Any;
use std::sync::Arc;

/// Depends on the auto-install gate and the initial completion marker.
///
/// On start it installs a second completion marker as its child, carrying
/// the artifacts recorded by the tracker.
pub struct GatedService {
    tracker: Arc<PendingSetTracker>,
    complete: UnitName,
}

impl GatedService {
    pub fn new(tracker: Arc<PendingSetTracker>, complete: UnitName) -> Self {
        Self { tracker, complete }
    }

    /// Install the gated service under `names.gated_service`
    pub fn install(
        registry: &dyn Registry,
        tracker: Arc<PendingSetTracker>,
        names: &BarrierNames,
    ) -> Result<(), RegistryError> {
        let initial = tracker.target().clone();
        let service = Arc::new(Self::new(tracker, names.gated_complete.clone()));
        registry.install(
            UnitSpec::new(names.gated_service.clone(), service)
                .with_dependency(names.autoinstall_complete.clone())
                .with_dependency(initial),
        )
    }

    /// Name of the marker installed on start
    pub fn complete_name(&self) -> &UnitName {
        &self.complete
    }
}

#[async_trait]
impl Service for GatedService {
    async fn start(&self, ctx: &StartContext) -> Result<(), StartError> {
        tracing::info!(unit = %ctx.name(), "starting gated service");

        let artifacts = self.tracker.snapshot_artifacts();
        tracing::debug!(count = artifacts.len(), marker = %self.complete, "installing artifacts marker");

        let marker = Arc::new(CompletionMarker::with_artifacts(artifacts));
        ctx.child_target()
            .install(UnitSpec::new(self.complete.clone(), marker))
            .map_err(|e| StartError::new(format!("failed to install {}: {}", self.complete, e)))
    }

    async fn stop(&self, ctx: &StopContext) {
        tracing::info!(unit = %ctx.name(), "stopping gated service");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "gated_tests.rs"]
mod tests;
