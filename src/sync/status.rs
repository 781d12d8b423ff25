// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// What the sync client is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Pushing,
    /// A push went out; waiting on the delayed re-pull to confirm it.
    AwaitingConfirm,
}

/// The user-facing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Success,
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Success => "synced",
            SyncStatus::Error => "sync failed",
        };
        f.write_str(s)
    }
}

/// A status that falls back to `Idle` once `timeout` has elapsed since it was set.
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    status: SyncStatus,
    set_at: Option<Instant>,
    timeout: Duration,
}

impl StatusIndicator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            status: SyncStatus::Idle,
            set_at: None,
            timeout,
        }
    }

    pub fn set(&mut self, status: SyncStatus, now: Instant) {
        self.status = status;
        self.set_at = Some(now);
    }

    pub fn current(&self, now: Instant) -> SyncStatus {
        match self.set_at {
            Some(at) if now.duration_since(at) < self.timeout => self.status,
            _ => SyncStatus::Idle,
        }
    }

    /// The instant at which the shown status reverts, if one is pending.
    pub fn revert_at(&self) -> Option<Instant> {
        match (self.status, self.set_at) {
            (SyncStatus::Idle, _) | (_, None) => None,
            (_, Some(at)) => Some(at + self.timeout),
        }
    }

    /// Drop an expired status; returns true if it changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.status != SyncStatus::Idle && self.current(now) == SyncStatus::Idle {
            self.status = SyncStatus::Idle;
            self.set_at = None;
            return true;
        }
        false
    }
}
