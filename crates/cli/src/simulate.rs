// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated deployment install phases

use async_trait::async_trait;
use sg_config::DeploymentConfig;
use sg_core::{Service, StartContext, StartError, UnitName, UnitSpec};
use sg_engine::{CompletionMarker, PendingSetTracker};
use std::any::Any;
use std::sync::Arc;

/// Install phase of one configured deployment.
///
/// When an artifact is configured it installs a `BUNDLE` child, registers it
/// with the barrier and records the artifact before finishing.
pub struct SimulatedInstall {
    deployment: String,
    config: DeploymentConfig,
    tracker: Arc<PendingSetTracker>,
}

impl SimulatedInstall {
    pub fn new(
        deployment: impl Into<String>,
        config: DeploymentConfig,
        tracker: Arc<PendingSetTracker>,
    ) -> Self {
        Self {
            deployment: deployment.into(),
            config,
            tracker,
        }
    }

    /// Unit this install phase runs as
    pub fn unit_name(&self) -> UnitName {
        UnitName::deployment(&self.deployment).install_phase()
    }

    pub fn into_spec(self) -> UnitSpec {
        UnitSpec::new(self.unit_name(), Arc::new(self))
    }
}

#[async_trait]
impl Service for SimulatedInstall {
    async fn start(&self, ctx: &StartContext) -> Result<(), StartError> {
        tracing::info!(deployment = %self.deployment, "installing deployment");

        if let Some(artifact) = &self.config.artifact {
            let bundle = UnitName::deployment(&self.deployment).append("BUNDLE");
            ctx.child_target()
                .install(UnitSpec::new(
                    bundle.clone(),
                    Arc::new(CompletionMarker::new()),
                ))
                .map_err(|e| StartError::new(e.to_string()))?;
            self.tracker.register_downstream(bundle.clone());
            self.tracker.record_artifact(bundle, artifact.clone());
        }

        if let Some(delay) = self.config.start_delay {
            tokio::time::sleep(delay).await;
        }

        if self.config.fail {
            return Err(StartError::new(format!(
                "deployment '{}' failed to install",
                self.deployment
            )));
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
