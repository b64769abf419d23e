// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending-set tracker for initial deployments
//!
//! Counts the install phases of a known set of deployments down to zero, then
//! installs a completion marker depending on every downstream name registered
//! while the count was open. Reaching running and failing to start both
//! count; the barrier tracks readiness, not health.
//!
//! One mutex guards the watched set, the downstream set, the artifacts and
//! the closing step. `remaining` is only written under that mutex and is
//! read without it for the `is_closed` fast path.

use crate::error::TrackerError;
use crate::gate::CompletionGate;
use sg_core::{
    Artifact, ArtifactMap, Registry, SubscriberId, Transition, TransitionListener, UnitName,
};
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

#[derive(Default)]
struct TrackerState {
    /// Install phases not yet finished
    watched: HashSet<UnitName>,
    downstream: BTreeSet<UnitName>,
    artifacts: ArtifactMap,
}

/// Builder for a tracker; the only place expected names can be removed
#[derive(Debug, Clone)]
pub struct TrackerBuilder {
    names: BTreeSet<String>,
    target: UnitName,
    subscriber: SubscriberId,
}

impl TrackerBuilder {
    /// Name of the completion marker to install
    pub fn target(mut self, target: UnitName) -> Self {
        self.target = target;
        self
    }

    pub fn subscriber(mut self, id: SubscriberId) -> Self {
        self.subscriber = id;
        self
    }

    /// Stop waiting for `name`. Returns false if it was not expected.
    pub fn remove_expected_name(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn expected_names(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// Create the tracker and subscribe it to `registry`.
    ///
    /// With no expected names the marker is installed right away and no
    /// subscription is made.
    pub fn start(
        self,
        registry: Arc<dyn Registry>,
    ) -> Result<Arc<PendingSetTracker>, TrackerError> {
        let watched: HashSet<UnitName> = self
            .names
            .iter()
            .map(|name| UnitName::deployment(name).install_phase())
            .collect();
        let (closed_tx, _) = watch::channel(false);

        let tracker = Arc::new(PendingSetTracker {
            gate: CompletionGate::new(self.target),
            subscriber: self.subscriber,
            remaining: AtomicUsize::new(watched.len()),
            state: Mutex::new(TrackerState {
                watched,
                ..Default::default()
            }),
            registry,
            closed_tx,
        });

        if tracker.is_closed() {
            let state = tracker.lock();
            tracker.complete(&state, false)?;
            drop(state);
            return Ok(tracker);
        }

        let listener: Arc<dyn TransitionListener> = tracker.clone();
        tracker
            .registry
            .subscribe(tracker.subscriber.clone(), listener)
            .map_err(TrackerError::Subscribe)?;
        Ok(tracker)
    }
}

/// Waits for the install phase of every initial deployment
pub struct PendingSetTracker {
    gate: CompletionGate,
    subscriber: SubscriberId,
    registry: Arc<dyn Registry>,
    remaining: AtomicUsize,
    state: Mutex<TrackerState>,
    closed_tx: watch::Sender<bool>,
}

impl PendingSetTracker {
    pub fn builder<I, S>(names: I) -> TrackerBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TrackerBuilder {
            names: names.into_iter().map(Into::into).collect(),
            target: sg_config::BarrierNames::default().initial_complete,
            subscriber: SubscriberId::generate("initial-deployments"),
        }
    }

    /// Build and start with default settings
    pub fn new(
        names: BTreeSet<String>,
        registry: Arc<dyn Registry>,
    ) -> Result<Arc<Self>, TrackerError> {
        Self::builder(names).start(registry)
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Name of the completion marker
    pub fn target(&self) -> &UnitName {
        self.gate.target()
    }

    pub fn subscriber(&self) -> &SubscriberId {
        &self.subscriber
    }

    pub fn is_closed(&self) -> bool {
        self.remaining.load(Ordering::Acquire) == 0
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Install phases still awaited, sorted
    pub fn outstanding(&self) -> Vec<UnitName> {
        let mut names: Vec<UnitName> = self.lock().watched.iter().cloned().collect();
        names.sort();
        names
    }

    /// Add a dependency of the completion marker.
    ///
    /// Returns false once closed: the name is dropped and will not be waited on.
    pub fn register_downstream(&self, name: UnitName) -> bool {
        let mut state = self.lock();
        if self.is_closed() {
            tracing::warn!(unit = %name, "barrier closed, downstream dependency dropped");
            return false;
        }
        tracing::info!(unit = %name, "add downstream dependency");
        state.downstream.insert(name);
        true
    }

    /// Record an installed artifact. Returns false once closed.
    pub fn record_artifact(&self, name: UnitName, artifact: Artifact) -> bool {
        let mut state = self.lock();
        if self.is_closed() {
            tracing::warn!(unit = %name, "barrier closed, artifact dropped");
            return false;
        }
        tracing::info!(unit = %name, location = %artifact.location, "add installed artifact");
        state.artifacts.entry(name).or_insert(artifact);
        true
    }

    /// Artifacts recorded so far, in recording order
    pub fn snapshot_artifacts(&self) -> ArtifactMap {
        self.lock().artifacts.clone()
    }

    /// Downstream names registered so far
    pub fn downstream_names(&self) -> BTreeSet<UnitName> {
        self.lock().downstream.clone()
    }

    /// Wait until the barrier has closed
    pub async fn closed(&self) {
        let mut rx = self.closed_tx.subscribe();
        // The sender is owned by `self`, so this only returns once closed
        let _ = rx.wait_for(|closed| *closed).await;
    }

    /// Close the barrier without waiting for the outstanding units.
    ///
    /// Returns false if it was already closed.
    pub fn force_close(&self) -> bool {
        if self.is_closed() {
            return false;
        }
        let mut state = self.lock();
        if self.is_closed() {
            return false;
        }

        let mut outstanding: Vec<String> =
            state.watched.drain().map(|n| n.to_string()).collect();
        outstanding.sort();
        tracing::warn!(?outstanding, "releasing initial deployments barrier");
        self.remaining.store(0, Ordering::Release);

        if let Err(e) = self.complete(&state, true) {
            tracing::error!(error = %e, "failed to install completion marker");
        }
        true
    }

    /// Unsubscribe and install the completion marker. Runs once, under the lock.
    fn complete(&self, state: &TrackerState, unsubscribe: bool) -> Result<(), TrackerError> {
        if unsubscribe {
            self.registry.unsubscribe(&self.subscriber);
        }
        tracing::info!(
            marker = %self.gate.target(),
            dependencies = state.downstream.len(),
            "initial deployments complete"
        );

        let result = self
            .gate
            .fire(self.registry.as_ref(), state.downstream.clone())
            .map_err(TrackerError::Install);
        self.closed_tx.send_replace(true);
        result
    }
}

impl TransitionListener for PendingSetTracker {
    fn on_transition(&self, name: &UnitName, transition: Transition) {
        if self.is_closed() {
            return;
        }

        let mut state = self.lock();
        if !state.watched.contains(name) {
            return;
        }
        if !transition.is_start_outcome() {
            tracing::debug!(unit = %name, %transition, "ignoring transition");
            return;
        }
        state.watched.remove(name);

        let remaining = self.remaining.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::info!(unit = %name, %transition, remaining, "deployment tracked");

        if remaining == 0 {
            if let Err(e) = self.complete(&state, true) {
                tracing::error!(error = %e, "failed to install completion marker");
            }
        }
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
