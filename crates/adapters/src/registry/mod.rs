// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry implementations

mod memory;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use memory::InMemoryRegistry;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRegistry, RegistryCall};
