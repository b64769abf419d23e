// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sg run <config>` - Run a simulated startup episode

use crate::error::CliError;
use crate::output::{self, OutputFormat};
use crate::simulate::SimulatedInstall;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use sg_adapters::{InMemoryRegistry, TracedRegistry};
use sg_config::{BarrierNames, StartupConfig, TomlNamesSource};
use sg_core::{Artifact, Registry, UnitName, UnitSpec, UnitState};
use sg_engine::{CompletionMarker, Episode, StallOutcome};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct RunArgs {
    /// Startup config file
    pub config: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct DeploymentSummary {
    pub name: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactSummary {
    pub unit: String,
    #[serde(flatten)]
    pub artifact: Artifact,
}

/// What happened during one episode
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub deployments: Vec<DeploymentSummary>,
    pub failed: Vec<String>,
    /// Dependencies of the initial completion marker
    pub downstream: Vec<String>,
    /// Artifacts carried by the gated marker, in recording order
    pub artifacts: Vec<ArtifactSummary>,
    /// Units still installing when the barrier was released
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<Vec<String>>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deployments:")?;
        for d in &self.deployments {
            match &d.error {
                Some(error) => writeln!(f, "  {:<20} {} ({})", d.name, d.state, error)?,
                None => writeln!(f, "  {:<20} {}", d.name, d.state)?,
            }
        }
        if let Some(released) = &self.released {
            writeln!(f, "Released with outstanding: {}", released.join(", "))?;
        }
        writeln!(f, "Downstream: {}", list_or_dash(&self.downstream))?;
        writeln!(f, "Artifacts:")?;
        if self.artifacts.is_empty() {
            writeln!(f, "  -")?;
        }
        for a in &self.artifacts {
            writeln!(f, "  {:<30} {}", a.unit, a.artifact.location)?;
        }
        write!(f, "Startup complete: {} failed", self.failed.len())
    }
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let registry = InMemoryRegistry::current()?;
    let traced: Arc<dyn Registry> = Arc::new(TracedRegistry::new(registry.clone()));

    let source = TomlNamesSource::from_config(config.clone());
    let mut episode = Episode::start(traced.clone(), &source, &config.barrier)
        .context("failed to start startup episode")?;
    let names = episode.names().clone();

    for (name, deployment) in &config.deployments {
        let install = SimulatedInstall::new(name, deployment.clone(), episode.tracker().clone());
        traced
            .install(install.into_spec())
            .with_context(|| format!("failed to install deployment '{}'", name))?;
    }
    spawn_autoinstall_gate(traced.clone(), &config, &names);

    let completed = tokio::select! {
        _ = registry.wait_for(&names.gated_complete, UnitState::Running) => true,
        _ = tokio::signal::ctrl_c() => false,
    };
    if !completed {
        let remaining = episode.tracker().remaining();
        registry.shutdown().await;
        return Err(CliError::interrupted(remaining).into());
    }

    let outcome = episode.closed().await;
    let summary = summarize(&registry, &config, &names, outcome);
    output::print(&summary, OutputFormat::from_json_flag(args.json));

    registry.shutdown().await;
    Ok(())
}

fn spawn_autoinstall_gate(registry: Arc<dyn Registry>, config: &StartupConfig, names: &BarrierNames) {
    let delay = config.autoinstall.delay;
    let name = names.autoinstall_complete.clone();
    tokio::spawn(async move {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        tracing::info!(unit = %name, "auto-install complete");
        if let Err(e) = registry.install(UnitSpec::new(name, Arc::new(CompletionMarker::new()))) {
            tracing::error!(error = %e, "failed to install auto-install gate");
        }
    });
}

fn summarize(
    registry: &InMemoryRegistry,
    config: &StartupConfig,
    names: &BarrierNames,
    outcome: StallOutcome,
) -> RunSummary {
    let deployments: Vec<DeploymentSummary> = config
        .deployment_names()
        .map(|name| {
            let unit = UnitName::deployment(name).install_phase();
            DeploymentSummary {
                name: name.to_string(),
                state: registry
                    .state(&unit)
                    .map_or_else(|| "missing".to_string(), |s| s.to_string()),
                error: registry.start_error(&unit),
            }
        })
        .collect();

    let failed = deployments
        .iter()
        .filter(|d| d.error.is_some())
        .map(|d| d.name.clone())
        .collect();

    let downstream = registry
        .dependencies(&names.initial_complete)
        .unwrap_or_default()
        .iter()
        .map(ToString::to_string)
        .collect();

    let artifacts = registry
        .service(&names.gated_complete)
        .and_then(|service| {
            service
                .as_any()
                .downcast_ref::<CompletionMarker>()
                .map(|marker| {
                    marker
                        .artifacts()
                        .iter()
                        .map(|(unit, artifact)| ArtifactSummary {
                            unit: unit.to_string(),
                            artifact: artifact.clone(),
                        })
                        .collect()
                })
        })
        .unwrap_or_default();

    let released = match outcome {
        StallOutcome::Completed => None,
        StallOutcome::Released { outstanding } => {
            Some(outstanding.iter().map(ToString::to_string).collect())
        }
    };

    RunSummary {
        deployments,
        failed,
        downstream,
        artifacts,
        released,
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
