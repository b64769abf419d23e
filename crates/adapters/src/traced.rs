// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced registry wrapper for consistent observability

use sg_core::{Registry, RegistryError, SubscriberId, TransitionListener, UnitSpec};
use std::sync::Arc;

/// Wrapper that adds tracing to any Registry
#[derive(Clone)]
pub struct TracedRegistry<R> {
    inner: R,
}

impl<R> TracedRegistry<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Registry> Registry for TracedRegistry<R> {
    fn subscribe(
        &self,
        id: SubscriberId,
        listener: Arc<dyn TransitionListener>,
    ) -> Result<(), RegistryError> {
        let span = tracing::info_span!("registry.subscribe", id = %id);
        let _guard = span.enter();

        let result = self.inner.subscribe(id, listener);
        match &result {
            Ok(()) => tracing::debug!("subscribed"),
            Err(e) => tracing::error!(error = %e, "subscribe failed"),
        }
        result
    }

    fn unsubscribe(&self, id: &SubscriberId) -> bool {
        let span = tracing::info_span!("registry.unsubscribe", id = %id);
        let _guard = span.enter();

        let removed = self.inner.unsubscribe(id);
        // Not finding the subscriber is fine (already removed)
        tracing::debug!(removed, "unsubscribed");
        removed
    }

    fn install(&self, spec: UnitSpec) -> Result<(), RegistryError> {
        let span = tracing::info_span!(
            "registry.install",
            unit = %spec.name,
            parent = spec.parent.as_ref().map(tracing::field::display),
        );
        let _guard = span.enter();

        let dependencies: Vec<String> = spec.dependencies.iter().map(ToString::to_string).collect();
        tracing::debug!(?dependencies, "installing");
        let result = self.inner.install(spec);
        match &result {
            Ok(()) => tracing::info!("installed"),
            Err(e) => tracing::error!(error = %e, "install failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
