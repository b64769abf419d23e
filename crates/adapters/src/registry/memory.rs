// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory registry running services on a tokio runtime
//!
//! A unit starts once every dependency is running. Each start runs in its
//! own task, so transitions of unrelated units reach listeners concurrently
//! while transitions of one unit arrive in order. A unit whose dependency
//! failed to start stays idle.

use sg_core::{
    Registry, RegistryError, Service, StartContext, StopContext, SubscriberId, Transition,
    TransitionListener, UnitName, UnitSpec, UnitState,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tokio::runtime::Handle;
use tokio::sync::watch;

struct UnitEntry {
    service: Arc<dyn Service>,
    dependencies: BTreeSet<UnitName>,
    parent: Option<UnitName>,
    state: UnitState,
    error: Option<String>,
}

struct Inner {
    units: Mutex<HashMap<UnitName, UnitEntry>>,
    listeners: RwLock<HashMap<SubscriberId, Arc<dyn TransitionListener>>>,
    /// Bumped after every state change, for waiters
    changes: watch::Sender<u64>,
    runtime: Handle,
}

/// Registry keeping all units in memory
#[derive(Clone)]
pub struct InMemoryRegistry {
    inner: Arc<Inner>,
}

impl InMemoryRegistry {
    pub fn new(runtime: Handle) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                units: Mutex::new(HashMap::new()),
                listeners: RwLock::new(HashMap::new()),
                changes,
                runtime,
            }),
        }
    }

    /// Registry bound to the current tokio runtime
    pub fn current() -> Result<Self, RegistryError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| RegistryError::Unavailable(e.to_string()))
    }

    fn units(&self) -> MutexGuard<'_, HashMap<UnitName, UnitEntry>> {
        self.inner.units.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self, name: &UnitName) -> Option<UnitState> {
        self.units().get(name).map(|e| e.state)
    }

    /// Error message of a unit that failed to start
    pub fn start_error(&self, name: &UnitName) -> Option<String> {
        self.units().get(name).and_then(|e| e.error.clone())
    }

    pub fn dependencies(&self, name: &UnitName) -> Option<BTreeSet<UnitName>> {
        self.units().get(name).map(|e| e.dependencies.clone())
    }

    pub fn service(&self, name: &UnitName) -> Option<Arc<dyn Service>> {
        self.units().get(name).map(|e| Arc::clone(&e.service))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Wait until `name` is in `state`
    pub async fn wait_for(&self, name: &UnitName, state: UnitState) {
        let mut rx = self.inner.changes.subscribe();
        // The sender lives in `inner`, so this only returns once the state matches
        let _ = rx.wait_for(|_| self.state(name) == Some(state)).await;
    }

    /// Stop `name` after everything that depends on it or is owned by it.
    /// Children of stopped units are removed.
    pub async fn stop(&self, name: &UnitName) -> Result<(), RegistryError> {
        let order = self.stop_order(name)?;
        for unit in &order {
            self.stop_one(unit).await;
        }

        let stopped: HashSet<&UnitName> = order.iter().collect();
        self.units()
            .retain(|_, e| !e.parent.as_ref().is_some_and(|p| stopped.contains(p)));
        self.changed();
        Ok(())
    }

    /// Stop every top-level unit
    pub async fn shutdown(&self) {
        let mut roots: Vec<UnitName> = self
            .units()
            .iter()
            .filter(|(_, e)| e.parent.is_none())
            .map(|(name, _)| name.clone())
            .collect();
        roots.sort();

        for root in roots {
            if let Err(e) = self.stop(&root).await {
                tracing::debug!(unit = %root, error = %e, "skipped during shutdown");
            }
        }
    }

    /// Units to stop, dependants and children before the units they need
    fn stop_order(&self, root: &UnitName) -> Result<Vec<UnitName>, RegistryError> {
        let units = self.units();
        if !units.contains_key(root) {
            return Err(RegistryError::UnitNotFound(root.clone()));
        }

        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(root.clone(), false)];
        while let Some((name, expanded)) = stack.pop() {
            if expanded {
                order.push(name);
                continue;
            }
            if !visited.insert(name.clone()) {
                continue;
            }
            stack.push((name.clone(), true));
            for (other, entry) in units.iter() {
                let owned = entry.parent.as_ref() == Some(&name);
                if (owned || entry.dependencies.contains(&name)) && !visited.contains(other) {
                    stack.push((other.clone(), false));
                }
            }
        }
        Ok(order)
    }

    async fn stop_one(&self, name: &UnitName) {
        let (service, transition) = {
            let mut units = self.units();
            let Some(entry) = units.get_mut(name) else {
                return;
            };
            let transition = match entry.state {
                UnitState::Running => Transition::UpToStopping,
                UnitState::StartFailed => Transition::StartFailedToStopping,
                _ => return,
            };
            entry.state = transition.to_state();
            (Arc::clone(&entry.service), transition)
        };
        self.notify(name, transition);

        service.stop(&StopContext::new(name.clone())).await;

        if let Some(entry) = self.units().get_mut(name) {
            entry.state = UnitState::Stopped;
        }
        self.notify(name, Transition::StoppingToStopped);
    }

    /// Start every idle unit whose dependencies are running
    fn schedule(&self) {
        let ready: Vec<(UnitName, Arc<dyn Service>)> = {
            let mut units = self.units();
            let names: Vec<UnitName> = units
                .iter()
                .filter(|(_, e)| {
                    e.state == UnitState::Idle
                        && e.dependencies
                            .iter()
                            .all(|d| units.get(d).is_some_and(|u| u.state.is_running()))
                })
                .map(|(name, _)| name.clone())
                .collect();

            names
                .into_iter()
                .filter_map(|name| {
                    let entry = units.get_mut(&name)?;
                    entry.state = UnitState::Starting;
                    Some((name, Arc::clone(&entry.service)))
                })
                .collect()
        };

        for (name, service) in ready {
            let registry = self.clone();
            self.inner
                .runtime
                .spawn(async move { registry.run_start(name, service).await });
        }
    }

    async fn run_start(self, name: UnitName, service: Arc<dyn Service>) {
        self.notify(&name, Transition::IdleToStarting);

        let ctx = StartContext::new(name.clone(), Arc::new(self.clone()));
        let result = service.start(&ctx).await;
        let transition = match &result {
            Ok(()) => {
                tracing::debug!(unit = %name, "started");
                Transition::StartingToUp
            }
            Err(e) => {
                tracing::warn!(unit = %name, error = %e, "failed to start");
                Transition::StartingToStartFailed
            }
        };

        {
            let mut units = self.units();
            let Some(entry) = units.get_mut(&name) else {
                return;
            };
            entry.state = transition.to_state();
            entry.error = result.err().map(|e| e.to_string());
        }
        self.notify(&name, transition);

        if transition == Transition::StartingToUp {
            self.schedule();
        }
    }

    fn notify(&self, name: &UnitName, transition: Transition) {
        let listeners: Vec<Arc<dyn TransitionListener>> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();

        for listener in listeners {
            listener.on_transition(name, transition);
        }
        self.changed();
    }

    fn changed(&self) {
        self.inner.changes.send_modify(|v| *v = v.wrapping_add(1));
    }
}

impl Registry for InMemoryRegistry {
    fn subscribe(
        &self,
        id: SubscriberId,
        listener: Arc<dyn TransitionListener>,
    ) -> Result<(), RegistryError> {
        let mut listeners = self
            .inner
            .listeners
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if listeners.contains_key(&id) {
            return Err(RegistryError::DuplicateSubscriber(id));
        }
        listeners.insert(id, listener);
        Ok(())
    }

    fn unsubscribe(&self, id: &SubscriberId) -> bool {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .is_some()
    }

    fn install(&self, spec: UnitSpec) -> Result<(), RegistryError> {
        {
            let mut units = self.units();
            if units.contains_key(&spec.name) {
                return Err(RegistryError::DuplicateUnit(spec.name));
            }
            if let Some(parent) = &spec.parent {
                if !units.contains_key(parent) {
                    return Err(RegistryError::UnitNotFound(parent.clone()));
                }
            }
            tracing::debug!(
                unit = %spec.name,
                dependencies = spec.dependencies.len(),
                "installed"
            );
            units.insert(
                spec.name,
                UnitEntry {
                    service: spec.service,
                    dependencies: spec.dependencies,
                    parent: spec.parent,
                    state: UnitState::Idle,
                    error: None,
                },
            );
        }
        self.changed();
        self.schedule();
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
