// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion marker units

use async_trait::async_trait;
use sg_core::{
    ArtifactMap, Registry, RegistryError, Service, StartContext, StartError, StopContext,
    UnitName, UnitSpec,
};
use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Service with no behaviour of its own.
///
/// Reaching running only signals that its dependencies are running. The
/// second-level marker carries the artifacts recorded by the barrier.
#[derive(Debug, Clone, Default)]
pub struct CompletionMarker {
    artifacts: ArtifactMap,
}

impl CompletionMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artifacts(artifacts: ArtifactMap) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &ArtifactMap {
        &self.artifacts
    }
}

#[async_trait]
impl Service for CompletionMarker {
    async fn start(&self, ctx: &StartContext) -> Result<(), StartError> {
        tracing::info!(
            unit = %ctx.name(),
            artifacts = self.artifacts.len(),
            "starting completion marker"
        );
        Ok(())
    }

    async fn stop(&self, ctx: &StopContext) {
        tracing::debug!(unit = %ctx.name(), "stopping completion marker");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Installs a completion marker under a fixed name
#[derive(Debug, Clone)]
pub struct CompletionGate {
    target: UnitName,
}

impl CompletionGate {
    pub fn new(target: UnitName) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &UnitName {
        &self.target
    }

    /// Install the marker depending on `dependencies`
    pub fn fire(
        &self,
        registry: &dyn Registry,
        dependencies: BTreeSet<UnitName>,
    ) -> Result<(), RegistryError> {
        let spec = UnitSpec::new(self.target.clone(), Arc::new(CompletionMarker::new()))
            .with_dependencies(dependencies);
        registry.install(spec)
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
