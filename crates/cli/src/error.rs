// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use sg_config::ConfigError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Config file could not be read or parsed
    pub fn config(path: &Path, error: ConfigError) -> Self {
        let err = match &error {
            ConfigError::Read { .. } => {
                CliError::new(format!("cannot read config '{}'", path.display()))
                    .with_context(error.to_string())
                    .with_suggestion("Check the path passed to sg")
            }
            ConfigError::Toml(_) | ConfigError::InvalidFormat(_) => {
                CliError::new(format!("invalid config '{}'", path.display()))
                    .with_context(error.to_string())
                    .with_suggestion("Deployments are declared as [deployment.<name>] tables")
                    .with_suggestion("Durations use humantime syntax, e.g. \"250ms\" or \"30s\"")
            }
        };
        err.with_source(error)
    }

    /// Interrupted before the gated service completed
    pub fn interrupted(remaining: usize) -> Self {
        CliError::new("interrupted before startup completed")
            .with_context(format!("{} initial deployment(s) still installing", remaining))
            .with_suggestion("Set [barrier] stall_timeout with on_stall = \"release\" to stop waiting on stuck deployments")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Print an error to stderr
pub fn report(error: &anyhow::Error) {
    match error.downcast_ref::<CliError>() {
        Some(cli) => eprint!("{}", cli),
        None => eprintln!("error: {:#}", error),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
