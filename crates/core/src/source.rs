// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source of the deployment names a startup episode waits for

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to resolve expected names: {0}")]
    Unavailable(String),
}

/// Resolves the initial set of expected deployment names
pub trait ExpectedNamesSource: Send + Sync {
    fn resolve_expected_names(&self) -> Result<BTreeSet<String>, ResolveError>;
}

/// Fixed set of names
#[derive(Clone, Debug, Default)]
pub struct StaticNames(pub BTreeSet<String>);

impl StaticNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl ExpectedNamesSource for StaticNames {
    fn resolve_expected_names(&self) -> Result<BTreeSet<String>, ResolveError> {
        Ok(self.0.clone())
    }
}
