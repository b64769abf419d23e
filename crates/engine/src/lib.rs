// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! startgate barrier engine

mod episode;
mod error;
mod gate;
mod gated;
mod tracker;
mod watchdog;

pub use episode::Episode;
pub use error::{EpisodeError, TrackerError};
pub use gate::{CompletionGate, CompletionMarker};
pub use gated::GatedService;
pub use tracker::{PendingSetTracker, TrackerBuilder};
pub use watchdog::{StallOutcome, StallWatchdog};
