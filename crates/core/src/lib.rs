// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sg-core: shared vocabulary for startgate
//!
//! This crate provides:
//! - Hierarchical unit names
//! - The unit lifecycle state machine and its transitions
//! - Artifact records
//! - Registry, service and listener traits consumed by the engine
//! - The expected-name source trait

pub mod artifact;
pub mod name;
pub mod registry;
pub mod source;
pub mod state;

pub use artifact::{Artifact, ArtifactMap};
pub use name::{UnitName, UnitNameError, DEPLOYMENT_BASE, INSTALL_PHASE};
pub use registry::{
    ChildTarget, Registry, RegistryError, Service, StartContext, StartError, StopContext,
    SubscriberId, TransitionListener, UnitSpec,
};
pub use source::{ExpectedNamesSource, ResolveError, StaticNames};
pub use state::{Transition, TransitionError, UnitState};
