// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One startup episode: tracker, gated service and watchdog

use crate::error::EpisodeError;
use crate::gated::GatedService;
use crate::tracker::PendingSetTracker;
use crate::watchdog::{StallOutcome, StallWatchdog};
use sg_config::{BarrierConfig, BarrierNames};
use sg_core::{ExpectedNamesSource, Registry};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Wires a tracker and the gated service into a registry
pub struct Episode {
    tracker: Arc<PendingSetTracker>,
    names: BarrierNames,
    watchdog: Option<JoinHandle<StallOutcome>>,
}

impl Episode {
    /// Resolve the expected names and install the barrier.
    ///
    /// Needs a tokio runtime only when a stall timeout is configured.
    pub fn start(
        registry: Arc<dyn Registry>,
        source: &dyn ExpectedNamesSource,
        config: &BarrierConfig,
    ) -> Result<Self, EpisodeError> {
        let expected = source.resolve_expected_names()?;
        tracing::info!(expected = expected.len(), "starting startup episode");

        let runtime = match config.stall_timeout {
            Some(_) if !expected.is_empty() => Some(
                tokio::runtime::Handle::try_current()
                    .map_err(|e| EpisodeError::NoRuntime(e.to_string()))?,
            ),
            _ => None,
        };

        let tracker = PendingSetTracker::builder(expected)
            .target(config.names.initial_complete.clone())
            .start(registry.clone())?;
        if let Err(e) = GatedService::install(registry.as_ref(), tracker.clone(), &config.names) {
            registry.unsubscribe(tracker.subscriber());
            return Err(e.into());
        }

        let watchdog = match runtime {
            Some(handle) if !tracker.is_closed() => {
                let watchdog = StallWatchdog::new(tracker.clone(), config);
                Some(handle.spawn(watchdog.run()))
            }
            _ => None,
        };

        Ok(Self {
            tracker,
            names: config.names.clone(),
            watchdog,
        })
    }

    pub fn tracker(&self) -> &Arc<PendingSetTracker> {
        &self.tracker
    }

    pub fn names(&self) -> &BarrierNames {
        &self.names
    }

    /// Wait for the barrier to close
    pub async fn closed(&mut self) -> StallOutcome {
        if let Some(handle) = self.watchdog.take() {
            match handle.await {
                Ok(outcome) => return outcome,
                Err(e) => tracing::warn!(error = %e, "stall watchdog ended early"),
            }
        }
        self.tracker.closed().await;
        StallOutcome::Completed
    }
}

impl Drop for Episode {
    fn drop(&mut self) {
        if let Some(handle) = self.watchdog.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "episode_tests.rs"]
mod tests;
