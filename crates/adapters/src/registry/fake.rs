// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake registry for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use sg_core::{
    Registry, RegistryError, SubscriberId, Transition, TransitionListener, UnitName, UnitSpec,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded registry call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Subscribe {
        id: SubscriberId,
    },
    Unsubscribe {
        id: SubscriberId,
    },
    Install {
        name: UnitName,
        dependencies: BTreeSet<UnitName>,
        parent: Option<UnitName>,
    },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<RegistryCall>,
    installed: Vec<UnitSpec>,
    listeners: HashMap<SubscriberId, Arc<dyn TransitionListener>>,
    subscribe_error: Option<RegistryError>,
    install_error: Option<RegistryError>,
}

/// Fake registry that records calls and delivers transitions on demand
#[derive(Clone, Default)]
pub struct FakeRegistry {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.lock().calls.clone()
    }

    /// Installed unit specs in install order
    pub fn installed(&self) -> Vec<UnitSpec> {
        self.lock().installed.clone()
    }

    pub fn installed_unit(&self, name: &UnitName) -> Option<UnitSpec> {
        self.lock()
            .installed
            .iter()
            .find(|spec| &spec.name == name)
            .cloned()
    }

    pub fn install_count(&self, name: &UnitName) -> usize {
        self.lock()
            .installed
            .iter()
            .filter(|spec| &spec.name == name)
            .count()
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RegistryCall::Unsubscribe { .. }))
            .count()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Make the next subscribe calls fail
    pub fn fail_subscribe(&self, error: RegistryError) {
        self.lock().subscribe_error = Some(error);
    }

    /// Make the next install calls fail
    pub fn fail_install(&self, error: RegistryError) {
        self.lock().install_error = Some(error);
    }

    /// Deliver a transition to the current subscribers on this thread
    pub fn emit(&self, name: &UnitName, transition: Transition) {
        let listeners: Vec<_> = self.lock().listeners.values().cloned().collect();
        for listener in listeners {
            listener.on_transition(name, transition);
        }
    }
}

impl Registry for FakeRegistry {
    fn subscribe(
        &self,
        id: SubscriberId,
        listener: Arc<dyn TransitionListener>,
    ) -> Result<(), RegistryError> {
        let mut state = self.lock();
        state
            .calls
            .push(RegistryCall::Subscribe { id: id.clone() });
        if let Some(error) = state.subscribe_error.clone() {
            return Err(error);
        }
        if state.listeners.contains_key(&id) {
            return Err(RegistryError::DuplicateSubscriber(id));
        }
        state.listeners.insert(id, listener);
        Ok(())
    }

    fn unsubscribe(&self, id: &SubscriberId) -> bool {
        let mut state = self.lock();
        state
            .calls
            .push(RegistryCall::Unsubscribe { id: id.clone() });
        state.listeners.remove(id).is_some()
    }

    fn install(&self, spec: UnitSpec) -> Result<(), RegistryError> {
        let mut state = self.lock();
        state.calls.push(RegistryCall::Install {
            name: spec.name.clone(),
            dependencies: spec.dependencies.clone(),
            parent: spec.parent.clone(),
        });
        if let Some(error) = state.install_error.clone() {
            return Err(error);
        }
        if state.installed.iter().any(|s| s.name == spec.name) {
            return Err(RegistryError::DuplicateUnit(spec.name));
        }
        state.installed.push(spec);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
