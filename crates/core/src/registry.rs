// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry seam: units, services, and the transition feed
//!
//! A registry runs units once their dependencies are running and reports
//! every lifecycle change to its subscribers. Subscribers see all units and
//! filter on their own.
//!
//! Implementations must not call back into a listener synchronously from
//! `subscribe`, `unsubscribe` or `install`; listeners may hold their own
//! locks while calling these.

use crate::name::UnitName;
use crate::state::Transition;
use async_trait::async_trait;
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unit already installed: {0}")]
    DuplicateUnit(UnitName),
    #[error("subscriber already registered: {0}")]
    DuplicateSubscriber(SubscriberId),
    #[error("unit not found: {0}")]
    UnitNotFound(UnitName),
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Handle used to unsubscribe, chosen by the subscriber
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Unique id with a readable prefix
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receives every lifecycle transition of every unit.
///
/// Called concurrently from the registry's workers.
pub trait TransitionListener: Send + Sync {
    fn on_transition(&self, name: &UnitName, transition: Transition);
}

/// Start failure reported by a service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StartError(pub String);

impl StartError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Behaviour run by a unit
#[async_trait]
pub trait Service: Send + Sync + 'static {
    async fn start(&self, ctx: &StartContext) -> Result<(), StartError>;

    async fn stop(&self, _ctx: &StopContext) {}

    fn as_any(&self) -> &dyn Any;
}

/// What to install: name, service, dependencies and owning parent
#[derive(Clone)]
pub struct UnitSpec {
    pub name: UnitName,
    pub service: Arc<dyn Service>,
    pub dependencies: BTreeSet<UnitName>,
    /// Children are removed when their parent stops
    pub parent: Option<UnitName>,
}

impl UnitSpec {
    pub fn new(name: UnitName, service: Arc<dyn Service>) -> Self {
        Self {
            name,
            service,
            dependencies: BTreeSet::new(),
            parent: None,
        }
    }

    pub fn with_dependency(mut self, name: UnitName) -> Self {
        self.dependencies.insert(name);
        self
    }

    pub fn with_dependencies(mut self, names: impl IntoIterator<Item = UnitName>) -> Self {
        self.dependencies.extend(names);
        self
    }

    pub fn with_parent(mut self, parent: UnitName) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Downcast the service for inspection
    pub fn service_as<T: 'static>(&self) -> Option<&T> {
        self.service.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for UnitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitSpec")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// A registry of units
pub trait Registry: Send + Sync {
    /// Subscribe `listener` to transitions of all units
    fn subscribe(
        &self,
        id: SubscriberId,
        listener: Arc<dyn TransitionListener>,
    ) -> Result<(), RegistryError>;

    /// Returns false if `id` was not subscribed
    fn unsubscribe(&self, id: &SubscriberId) -> bool;

    fn install(&self, spec: UnitSpec) -> Result<(), RegistryError>;
}

impl<R: Registry + ?Sized> Registry for Arc<R> {
    fn subscribe(
        &self,
        id: SubscriberId,
        listener: Arc<dyn TransitionListener>,
    ) -> Result<(), RegistryError> {
        (**self).subscribe(id, listener)
    }

    fn unsubscribe(&self, id: &SubscriberId) -> bool {
        (**self).unsubscribe(id)
    }

    fn install(&self, spec: UnitSpec) -> Result<(), RegistryError> {
        (**self).install(spec)
    }
}

/// Installs units scoped to a parent
#[derive(Clone)]
pub struct ChildTarget {
    parent: UnitName,
    registry: Arc<dyn Registry>,
}

impl ChildTarget {
    pub fn new(parent: UnitName, registry: Arc<dyn Registry>) -> Self {
        Self { parent, registry }
    }

    pub fn parent(&self) -> &UnitName {
        &self.parent
    }

    pub fn install(&self, spec: UnitSpec) -> Result<(), RegistryError> {
        self.registry.install(spec.with_parent(self.parent.clone()))
    }
}

/// Passed to `Service::start`
pub struct StartContext {
    name: UnitName,
    child_target: ChildTarget,
}

impl StartContext {
    pub fn new(name: UnitName, registry: Arc<dyn Registry>) -> Self {
        Self {
            child_target: ChildTarget::new(name.clone(), registry),
            name,
        }
    }

    pub fn name(&self) -> &UnitName {
        &self.name
    }

    /// Target for units owned by this one
    pub fn child_target(&self) -> &ChildTarget {
        &self.child_target
    }
}

/// Passed to `Service::stop`
#[derive(Debug, Clone)]
pub struct StopContext {
    name: UnitName,
}

impl StopContext {
    pub fn new(name: UnitName) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &UnitName {
        &self.name
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
