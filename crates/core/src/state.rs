// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit lifecycle state machine
//!
//! ```text
//! Idle -> Starting -> Running -----> Stopping -> Stopped
//!                  \-> StartFailed -/
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a unit in the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Idle,
    Starting,
    Running,
    StartFailed,
    Stopping,
    Stopped,
}

impl UnitState {
    /// Transition that moves from `self` to `next`
    pub fn transition_to(self, next: UnitState) -> Result<Transition, TransitionError> {
        Transition::ALL
            .into_iter()
            .find(|t| t.from_state() == self && t.to_state() == next)
            .ok_or(TransitionError { from: self, to: next })
    }

    /// Start has finished, one way or the other
    pub fn is_started(self) -> bool {
        matches!(self, UnitState::Running | UnitState::StartFailed)
    }

    pub fn is_running(self) -> bool {
        self == UnitState::Running
    }

    pub fn is_stopped(self) -> bool {
        self == UnitState::Stopped
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitState::Idle => "idle",
            UnitState::Starting => "starting",
            UnitState::Running => "running",
            UnitState::StartFailed => "start_failed",
            UnitState::Stopping => "stopping",
            UnitState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// A lifecycle change delivered to registry listeners
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transition {
    IdleToStarting,
    StartingToUp,
    StartingToStartFailed,
    UpToStopping,
    StartFailedToStopping,
    StoppingToStopped,
}

impl Transition {
    pub const ALL: [Transition; 6] = [
        Transition::IdleToStarting,
        Transition::StartingToUp,
        Transition::StartingToStartFailed,
        Transition::UpToStopping,
        Transition::StartFailedToStopping,
        Transition::StoppingToStopped,
    ];

    pub fn from_state(self) -> UnitState {
        match self {
            Transition::IdleToStarting => UnitState::Idle,
            Transition::StartingToUp | Transition::StartingToStartFailed => UnitState::Starting,
            Transition::UpToStopping => UnitState::Running,
            Transition::StartFailedToStopping => UnitState::StartFailed,
            Transition::StoppingToStopped => UnitState::Stopping,
        }
    }

    pub fn to_state(self) -> UnitState {
        match self {
            Transition::IdleToStarting => UnitState::Starting,
            Transition::StartingToUp => UnitState::Running,
            Transition::StartingToStartFailed => UnitState::StartFailed,
            Transition::UpToStopping | Transition::StartFailedToStopping => UnitState::Stopping,
            Transition::StoppingToStopped => UnitState::Stopped,
        }
    }

    /// Reached running or failed to start; the unit will not change again
    /// without outside intervention
    pub fn is_start_outcome(self) -> bool {
        matches!(
            self,
            Transition::StartingToUp | Transition::StartingToStartFailed
        )
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transition::IdleToStarting => "IDLE_to_STARTING",
            Transition::StartingToUp => "STARTING_to_UP",
            Transition::StartingToStartFailed => "STARTING_to_START_FAILED",
            Transition::UpToStopping => "UP_to_STOPPING",
            Transition::StartFailedToStopping => "START_FAILED_to_STOPPING",
            Transition::StoppingToStopped => "STOPPING_to_STOPPED",
        };
        f.write_str(s)
    }
}

/// Requested state change is not part of the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition from {from} to {to}")]
pub struct TransitionError {
    pub from: UnitState,
    pub to: UnitState,
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
