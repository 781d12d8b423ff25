// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The long-running sync session.
//!
//! One task owns the ledger and the sync client and multiplexes everything that
//! can happen to them: the poll interval, the delayed re-pull after a push, the
//! status revert, user commands and shutdown. Nothing here needs a lock because
//! nothing else touches the ledger while the session runs.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

use super::engine::{PullOutcome, PullTrigger, PushOutcome, SyncClient};
use crate::error::Rejection;
use crate::models::{Transaction, TransactionDraft};
use crate::store::Ledger;

#[derive(Debug)]
pub enum SessionCommand {
    Pull,
    Submit(TransactionDraft),
    Delete(String),
    SetEndpoint(Option<String>),
    Shutdown,
}

pub struct Session<'a> {
    ledger: &'a mut Ledger,
    sync: &'a mut SyncClient,
    repull_at: Option<Instant>,
}

impl<'a> Session<'a> {
    pub fn new(ledger: &'a mut Ledger, sync: &'a mut SyncClient) -> Self {
        Self {
            ledger,
            sync,
            repull_at: None,
        }
    }

    /// Record a draft locally, then replicate it. A successful push schedules a
    /// re-pull so the remote's copy replaces the optimistic one.
    pub async fn submit(&mut self, draft: TransactionDraft) -> Result<Transaction, Rejection> {
        let tx = self.ledger.record(draft)?;
        if self.sync.push(&tx).await == PushOutcome::Sent {
            self.repull_at = Some(Instant::now() + self.sync.settings().repull_delay);
        }
        Ok(tx)
    }

    /// Runs until `shutdown` resolves or a `Shutdown` command arrives.
    pub async fn run<F>(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut poll = self.new_poll();
        let mut commands_open = true;

        if self.sync.endpoint().is_some() {
            self.sync.pull(self.ledger, PullTrigger::Background).await;
        }

        loop {
            let repull_at = self.repull_at;
            let revert_at = self.sync.status_indicator().revert_at();
            tokio::select! {
                _ = &mut shutdown => break,
                _ = poll.tick() => {
                    if self.sync.endpoint().is_some() {
                        self.sync.pull(self.ledger, PullTrigger::Background).await;
                    }
                }
                _ = sleep_until_opt(repull_at) => {
                    self.repull_at = None;
                    self.sync.pull(self.ledger, PullTrigger::Background).await;
                }
                _ = sleep_until_opt(revert_at) => {
                    if self.sync.status_indicator().expire(Instant::now()) {
                        info!("Sync status back to idle");
                    }
                }
                cmd = commands.recv(), if commands_open => match cmd {
                    Some(SessionCommand::Shutdown) => break,
                    Some(SessionCommand::SetEndpoint(url)) => {
                        if self.sync.set_endpoint(url) {
                            info!(endpoint = ?self.sync.endpoint(), "Endpoint changed, restarting poll timer");
                            poll = self.new_poll();
                            self.sync.pull(self.ledger, PullTrigger::Background).await;
                        }
                    }
                    Some(cmd) => self.handle(cmd).await,
                    None => commands_open = false,
                },
            }
        }
        info!("Sync session stopped");
    }

    async fn handle(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Pull => {
                if self.sync.pull(self.ledger, PullTrigger::User).await == PullOutcome::Failed {
                    warn!("Refresh failed: {}", self.sync.status());
                }
            }
            SessionCommand::Submit(draft) => match self.submit(draft).await {
                Ok(tx) => info!(id = %tx.id, "Recorded {} {} -> {}", tx.amount, tx.from, tx.to),
                Err(why) => warn!("Ignored submission: {}", why),
            },
            SessionCommand::Delete(id) => match self.ledger.delete_transaction(&id) {
                Ok(true) => info!(%id, "Deleted transaction locally"),
                Ok(false) => info!(%id, "No transaction with that id"),
                Err(e) => warn!(error = %e, "Could not persist deletion"),
            },
            SessionCommand::SetEndpoint(_) | SessionCommand::Shutdown => {}
        }
    }

    fn new_poll(&self) -> Interval {
        let period = self.sync.settings().poll_interval;
        let mut poll = time::interval_at(Instant::now() + period, period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        poll
    }
}

async fn sleep_until_opt(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}
