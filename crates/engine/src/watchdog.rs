// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stall watchdog for an open barrier

use crate::tracker::PendingSetTracker;
use sg_config::{BarrierConfig, StallPolicy};
use sg_core::UnitName;
use std::sync::Arc;
use std::time::Duration;

/// How the barrier closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StallOutcome {
    /// Every expected install phase finished
    Completed,
    /// Closed by the watchdog with these units still outstanding
    Released { outstanding: Vec<UnitName> },
}

/// Warns while the barrier stays open and optionally releases it
pub struct StallWatchdog {
    tracker: Arc<PendingSetTracker>,
    timeout: Option<Duration>,
    policy: StallPolicy,
}

impl StallWatchdog {
    pub fn new(tracker: Arc<PendingSetTracker>, config: &BarrierConfig) -> Self {
        Self {
            tracker,
            timeout: config.stall_timeout,
            policy: config.on_stall,
        }
    }

    /// Run until the barrier closes
    pub async fn run(self) -> StallOutcome {
        let Some(timeout) = self.timeout else {
            self.tracker.closed().await;
            return StallOutcome::Completed;
        };

        let mut waited = Duration::ZERO;
        loop {
            if tokio::time::timeout(timeout, self.tracker.closed())
                .await
                .is_ok()
            {
                return StallOutcome::Completed;
            }
            waited += timeout;

            let outstanding = self.tracker.outstanding();
            let names: Vec<String> = outstanding.iter().map(ToString::to_string).collect();
            tracing::warn!(
                remaining = self.tracker.remaining(),
                outstanding = ?names,
                waited_ms = millis(waited),
                "initial deployments stalled"
            );

            match self.policy {
                StallPolicy::Wait => continue,
                StallPolicy::Release => {
                    return if self.tracker.force_close() {
                        StallOutcome::Released { outstanding }
                    } else {
                        StallOutcome::Completed
                    };
                }
            }
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
