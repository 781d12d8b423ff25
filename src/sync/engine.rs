// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pull/push semantics on top of a [`RemoteLedger`] transport.
//!
//! Writes are optimistic: the ledger is updated first, the push is fire-and-forget,
//! and a delayed pull later replaces local state with whatever the remote holds.
//! There is no merge step; the last pull wins.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::client::{RemoteLedger, cache_busted, parse_endpoint};
use super::status::{StatusIndicator, SyncPhase, SyncStatus};
use crate::models::{Transaction, WireTransaction};
use crate::store::Ledger;

#[derive(Debug, Clone, Copy)]
pub struct SyncSettings {
    pub poll_interval: Duration,
    pub repull_delay: Duration,
    pub status_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(20),
            repull_delay: Duration::from_secs(2),
            status_timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullTrigger {
    /// Asked for by the user; failures are shown.
    User,
    /// Scheduled polling; failures stay quiet.
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// No endpoint configured.
    Skipped,
    Replaced(usize),
    /// The remote answered with something other than an array.
    Ignored,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Skipped,
    /// Left without a transport error; a re-pull should follow.
    Sent,
    Failed,
}

pub struct SyncClient {
    remote: Box<dyn RemoteLedger>,
    endpoint: Option<String>,
    phase: SyncPhase,
    status: StatusIndicator,
    settings: SyncSettings,
}

impl SyncClient {
    pub fn new(
        remote: Box<dyn RemoteLedger>,
        endpoint: Option<String>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            remote,
            endpoint: endpoint.filter(|u| !u.trim().is_empty()),
            phase: SyncPhase::Idle,
            status: StatusIndicator::new(settings.status_timeout),
            settings,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns true when the endpoint actually changed.
    pub fn set_endpoint(&mut self, endpoint: Option<String>) -> bool {
        let endpoint = endpoint.filter(|u| !u.trim().is_empty());
        if endpoint == self.endpoint {
            return false;
        }
        self.endpoint = endpoint;
        true
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn status(&self) -> SyncStatus {
        self.status.current(Instant::now())
    }

    pub fn status_indicator(&mut self) -> &mut StatusIndicator {
        &mut self.status
    }

    /// Fetch the remote list and install it. Prior state is kept on any failure.
    pub async fn pull(&mut self, ledger: &mut Ledger, trigger: PullTrigger) -> PullOutcome {
        let Some(raw) = self.endpoint.clone() else {
            return PullOutcome::Skipped;
        };
        self.phase = SyncPhase::Fetching;
        let outcome = self.pull_from(&raw, ledger, trigger).await;
        // Any completed pull also settles a pending push confirmation.
        self.phase = SyncPhase::Idle;
        outcome
    }

    async fn pull_from(&mut self, raw: &str, ledger: &mut Ledger, trigger: PullTrigger) -> PullOutcome {
        let fetched = match parse_endpoint(raw) {
            Ok(url) => {
                let url = cache_busted(&url, Utc::now().timestamp_millis());
                self.remote.fetch(&url).await
            }
            Err(e) => Err(e),
        };
        let body = match fetched {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, ?trigger, "Pull failed");
                if trigger == PullTrigger::User {
                    self.status.set(SyncStatus::Error, Instant::now());
                }
                return PullOutcome::Failed;
            }
        };
        let Value::Array(items) = body else {
            warn!(payload = %truncate(&body.to_string(), 200), "Remote returned non-array data, ignoring");
            return PullOutcome::Ignored;
        };
        match ledger.replace_from_remote(&items) {
            Ok(n) => {
                info!(transactions = n, "Pulled remote ledger");
                PullOutcome::Replaced(n)
            }
            Err(e) => {
                // The in-memory set is already replaced; only the local mirror lagged.
                error!(error = %e, "Could not persist pulled transactions");
                PullOutcome::Replaced(ledger.transactions().len())
            }
        }
    }

    /// Send one new transaction. The caller schedules the confirming re-pull.
    pub async fn push(&mut self, tx: &Transaction) -> PushOutcome {
        let Some(raw) = self.endpoint.clone() else {
            return PushOutcome::Skipped;
        };
        self.phase = SyncPhase::Pushing;
        let body = serde_json::to_string(&WireTransaction::from(tx));
        let sent = match (parse_endpoint(&raw), body) {
            (Ok(url), Ok(body)) => self.remote.submit(&url, body).await,
            (Err(e), _) => Err(e),
            (_, Err(e)) => Err(e.into()),
        };
        let now = Instant::now();
        match sent {
            Ok(()) => {
                info!(id = %tx.id, "Pushed transaction to remote");
                self.status.set(SyncStatus::Success, now);
                self.phase = SyncPhase::AwaitingConfirm;
                PushOutcome::Sent
            }
            Err(e) => {
                warn!(id = %tx.id, error = %e, "Push failed");
                self.status.set(SyncStatus::Error, now);
                self.phase = SyncPhase::Idle;
                PushOutcome::Failed
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}
