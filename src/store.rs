// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The single-writer ledger store.
//!
//! [`Ledger`] owns the canonical parties and transactions for the session and
//! mirrors both into the SQLite slots after every mutation. The slots are a
//! cache: once remote sync is configured, the remote endpoint is authoritative
//! and each pull replaces the local transaction set wholesale.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::db::{self, PARTIES_SLOT, TRANSACTIONS_SLOT};
use crate::error::{LedgerError, Rejection, Result};
use crate::models::{MAX_AMOUNT, Party, Transaction, TransactionDraft, new_id};
use crate::reconcile::reconcile_parties;
use crate::sync::normalize::normalize_all;

pub const DEFAULT_PARTIES: [&str; 2] = ["Abhishek", "Abhinav"];

pub struct Ledger {
    conn: Connection,
    parties: Vec<Party>,
    transactions: Vec<Transaction>,
    last_updated: Option<DateTime<Utc>>,
}

impl Ledger {
    /// Read both slots once. A missing parties slot seeds the default parties.
    pub fn load(conn: Connection) -> Result<Self> {
        let parties = match read_json::<Vec<Party>>(&conn, PARTIES_SLOT)? {
            Some(p) => p,
            None => DEFAULT_PARTIES
                .iter()
                .enumerate()
                .map(|(i, name)| Party {
                    id: (i + 1).to_string(),
                    name: name.to_string(),
                })
                .collect(),
        };
        let transactions = read_json::<Vec<Transaction>>(&conn, TRANSACTIONS_SLOT)?
            .unwrap_or_default();
        debug!(
            parties = parties.len(),
            transactions = transactions.len(),
            "Loaded ledger"
        );
        Ok(Self {
            conn,
            parties,
            transactions,
            last_updated: None,
        })
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn party_names(&self) -> Vec<String> {
        self.parties.iter().map(|p| p.name.clone()).collect()
    }

    /// When the transaction set was last replaced from the remote.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert at the head of the sequence. Dates are not re-sorted here.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<()> {
        self.transactions.insert(0, tx);
        self.after_transactions_changed()
    }

    /// Validate a user draft and record it. Invalid drafts leave the ledger untouched.
    pub fn submit(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let tx = validate_draft(draft, Utc::now()).map_err(LedgerError::Rejected)?;
        self.add_transaction(tx.clone())?;
        Ok(tx)
    }

    /// Validate and record a draft, keeping the insert even when the local mirror
    /// cannot be written. The write failure is logged; only a rejection is returned.
    pub fn record(&mut self, draft: TransactionDraft) -> std::result::Result<Transaction, Rejection> {
        let tx = validate_draft(draft, Utc::now())?;
        if let Err(e) = self.add_transaction(tx.clone()) {
            error!(id = %tx.id, error = %e, "Could not persist new transaction");
        }
        Ok(tx)
    }

    /// Remove by id; returns whether anything was removed.
    pub fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        let removed = self.transactions.len() != before;
        self.persist_transactions()?;
        Ok(removed)
    }

    /// Wholesale replacement, newest first. Entries with a blank id get a fresh one.
    pub fn replace_transactions(&mut self, mut list: Vec<Transaction>) -> Result<()> {
        for tx in list.iter_mut() {
            if tx.id.trim().is_empty() {
                tx.id = new_id();
            }
        }
        list.sort_by(|a, b| b.date.cmp(&a.date));
        self.transactions = list;
        self.last_updated = Some(Utc::now());
        self.after_transactions_changed()
    }

    /// Normalize a remote array and install it; returns the number of rows kept.
    pub fn replace_from_remote(&mut self, values: &[Value]) -> Result<usize> {
        let list = normalize_all(values, Utc::now());
        let n = list.len();
        self.replace_transactions(list)?;
        Ok(n)
    }

    /// Add a party by name. Blank names and case-insensitive duplicates are ignored.
    pub fn add_party(&mut self, name: &str) -> Result<Option<Party>> {
        let name = name.trim();
        if name.is_empty() || self.parties.iter().any(|p| p.matches(name)) {
            return Ok(None);
        }
        let party = Party::new(name);
        self.parties.push(party.clone());
        self.persist_parties()?;
        Ok(Some(party))
    }

    fn after_transactions_changed(&mut self) -> Result<()> {
        let added = reconcile_parties(&mut self.parties, &self.transactions);
        if !added.is_empty() {
            info!(
                count = added.len(),
                "Added parties referenced by transactions"
            );
            self.persist_parties()?;
        }
        self.persist_transactions()
    }

    fn persist_parties(&self) -> Result<()> {
        write_json(&self.conn, PARTIES_SLOT, &self.parties)
    }

    fn persist_transactions(&self) -> Result<()> {
        write_json(&self.conn, TRANSACTIONS_SLOT, &self.transactions)
    }
}

pub fn validate_draft(
    draft: TransactionDraft,
    now: DateTime<Utc>,
) -> std::result::Result<Transaction, Rejection> {
    let amount = draft
        .amount
        .trim()
        .parse::<Decimal>()
        .map_err(|_| Rejection::InvalidAmount)?;
    if amount <= Decimal::ZERO || amount > MAX_AMOUNT {
        return Err(Rejection::InvalidAmount);
    }
    let from = draft.from.trim().to_string();
    let to = draft.to.trim().to_string();
    if from.is_empty() {
        return Err(Rejection::EmptySender);
    }
    if to.is_empty() {
        return Err(Rejection::EmptyRecipient);
    }
    if from.to_lowercase() == to.to_lowercase() {
        return Err(Rejection::SelfTransfer);
    }
    Ok(Transaction {
        id: new_id(),
        from,
        to,
        amount,
        kind: draft.kind,
        payment_method: Some(draft.payment_method),
        date: now,
        note: draft.note,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(conn: &Connection, slot: &str) -> Result<Option<T>> {
    let Some(raw) = db::read_slot(conn, slot)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            warn!(slot, error = %e, "Unreadable slot, starting from defaults");
            Ok(None)
        }
    }
}

fn write_json<T: serde::Serialize>(conn: &Connection, slot: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    db::write_slot(conn, slot, &raw)?;
    Ok(())
}
