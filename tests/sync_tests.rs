// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cashflow::db;
use cashflow::error::SyncError;
use cashflow::models::{PaymentMethod, TransactionDraft, TransactionKind};
use cashflow::store::Ledger;
use cashflow::sync::{
    PullOutcome, PullTrigger, PushOutcome, RemoteLedger, Session, SessionCommand, SyncClient,
    SyncPhase, SyncSettings, SyncStatus,
};
use reqwest::Url;
use rusqlite::Connection;
use serde_json::{Value, json};
use tokio::sync::mpsc;

const ENDPOINT: &str = "https://sheet.example.com/exec";

#[derive(Default)]
struct FakeState {
    body: Option<Value>,
    fail_submit: bool,
    fetched: Vec<String>,
    submitted: Vec<String>,
}

#[derive(Clone, Default)]
struct FakeRemote(Arc<Mutex<FakeState>>);

impl FakeRemote {
    fn serving(body: Value) -> Self {
        let fake = Self::default();
        fake.0.lock().unwrap().body = Some(body);
        fake
    }

    fn fetches(&self) -> usize {
        self.0.lock().unwrap().fetched.len()
    }
}

#[async_trait]
impl RemoteLedger for FakeRemote {
    async fn fetch(&self, url: &Url) -> Result<Value, SyncError> {
        let mut s = self.0.lock().unwrap();
        s.fetched.push(url.to_string());
        s.body.clone().ok_or(SyncError::Status(500))
    }

    async fn submit(&self, _url: &Url, body: String) -> Result<(), SyncError> {
        let mut s = self.0.lock().unwrap();
        if s.fail_submit {
            return Err(SyncError::Status(0));
        }
        s.submitted.push(body);
        Ok(())
    }
}

fn ledger() -> Ledger {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    Ledger::load(conn).unwrap()
}

fn client(remote: &FakeRemote, endpoint: Option<&str>) -> SyncClient {
    SyncClient::new(
        Box::new(remote.clone()),
        endpoint.map(str::to_string),
        SyncSettings::default(),
    )
}

fn draft(from: &str, to: &str, amount: &str) -> TransactionDraft {
    TransactionDraft {
        from: from.into(),
        to: to.into(),
        amount: amount.into(),
        kind: TransactionKind::Credit,
        payment_method: PaymentMethod::Bank,
        note: String::new(),
    }
}

#[tokio::test]
async fn pull_installs_remote_rows_with_cache_bust() {
    let remote = FakeRemote::serving(json!([
        {"id": "r1", "from": "Abhishek", "to": "Sunil", "amount": 50, "type": "CREDIT", "date": "2025-02-01T09:00:00Z"},
        {"from": "Sunil", "to": "Abhinav", "amount": "20", "type": "DEBIT", "date": "2025-02-03T09:00:00Z"}
    ]));
    let mut l = ledger();
    let mut sync = client(&remote, Some(ENDPOINT));

    let out = sync.pull(&mut l, PullTrigger::User).await;
    assert_eq!(out, PullOutcome::Replaced(2));
    assert_eq!(l.transactions()[0].from, "Sunil");
    assert!(l.party_names().contains(&"Sunil".to_string()));
    assert_eq!(sync.phase(), SyncPhase::Idle);

    let url = remote.0.lock().unwrap().fetched[0].clone();
    assert!(url.starts_with("https://sheet.example.com/exec?_t="));
}

#[tokio::test]
async fn non_array_payload_is_ignored() {
    let remote = FakeRemote::serving(json!({"error": "x"}));
    let mut l = ledger();
    l.submit(draft("Abhishek", "Abhinav", "10")).unwrap();
    let before = l.transactions().to_vec();
    let mut sync = client(&remote, Some(ENDPOINT));

    assert_eq!(sync.pull(&mut l, PullTrigger::User).await, PullOutcome::Ignored);
    assert_eq!(l.transactions(), before.as_slice());
    assert_eq!(sync.status(), SyncStatus::Idle);
}

#[tokio::test]
async fn user_pull_failure_shows_error_background_failure_does_not() {
    let remote = FakeRemote::default();
    let mut l = ledger();
    l.submit(draft("Abhishek", "Abhinav", "10")).unwrap();
    let mut sync = client(&remote, Some(ENDPOINT));

    assert_eq!(sync.pull(&mut l, PullTrigger::Background).await, PullOutcome::Failed);
    assert_eq!(sync.status(), SyncStatus::Idle);

    assert_eq!(sync.pull(&mut l, PullTrigger::User).await, PullOutcome::Failed);
    assert_eq!(sync.status(), SyncStatus::Error);
    assert_eq!(l.transactions().len(), 1);
}

#[tokio::test]
async fn malformed_endpoint_fails_without_request() {
    let remote = FakeRemote::serving(json!([]));
    let mut l = ledger();
    let mut sync = client(&remote, Some("not a url"));

    assert_eq!(sync.pull(&mut l, PullTrigger::User).await, PullOutcome::Failed);
    let tx = l.submit(draft("Abhishek", "Abhinav", "3")).unwrap();
    assert_eq!(sync.push(&tx).await, PushOutcome::Failed);
    assert_eq!(remote.fetches(), 0);
    assert_eq!(sync.status(), SyncStatus::Error);
}

#[tokio::test]
async fn no_endpoint_skips_both_directions() {
    let remote = FakeRemote::serving(json!([]));
    let mut l = ledger();
    let mut sync = client(&remote, None);
    let tx = l.submit(draft("Abhishek", "Abhinav", "3")).unwrap();
    assert_eq!(sync.pull(&mut l, PullTrigger::User).await, PullOutcome::Skipped);
    assert_eq!(sync.push(&tx).await, PushOutcome::Skipped);
    assert_eq!(l.transactions().len(), 1);
}

#[tokio::test]
async fn push_sends_wire_json_and_awaits_confirmation() {
    let remote = FakeRemote::serving(json!([]));
    let mut l = ledger();
    let mut sync = client(&remote, Some(ENDPOINT));
    let tx = l.submit(draft("Abhishek", "Abhinav", "12.5")).unwrap();

    assert_eq!(sync.push(&tx).await, PushOutcome::Sent);
    assert_eq!(sync.status(), SyncStatus::Success);
    assert_eq!(sync.phase(), SyncPhase::AwaitingConfirm);

    let body: Value = serde_json::from_str(&remote.0.lock().unwrap().submitted[0]).unwrap();
    assert_eq!(body["type"], "CREDIT");
    assert_eq!(body["paymentMethod"], "BANK");
    assert_eq!(body["amount"], 12.5);
    assert_eq!(body["id"], tx.id.as_str());

    sync.pull(&mut l, PullTrigger::Background).await;
    assert_eq!(sync.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn failed_push_reports_error() {
    let remote = FakeRemote::serving(json!([]));
    remote.0.lock().unwrap().fail_submit = true;
    let mut l = ledger();
    let mut sync = client(&remote, Some(ENDPOINT));
    let tx = l.submit(draft("Abhishek", "Abhinav", "1")).unwrap();
    assert_eq!(sync.push(&tx).await, PushOutcome::Failed);
    assert_eq!(sync.status(), SyncStatus::Error);
    assert_eq!(sync.phase(), SyncPhase::Idle);
    // The optimistic insert stays in place.
    assert_eq!(l.transactions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn session_polls_and_repulls_after_push() {
    let remote = FakeRemote::serving(json!([
        {"id": "r1", "from": "Abhishek", "to": "Abhinav", "amount": 5, "type": "CREDIT", "date": "2025-02-01"}
    ]));
    let mut l = ledger();
    let mut sync = client(&remote, Some(ENDPOINT));
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::Submit(draft("Abhishek", "Abhinav", "9"))).unwrap();

    Session::new(&mut l, &mut sync)
        .run(rx, tokio::time::sleep(Duration::from_secs(45)))
        .await;

    // initial pull, re-pull two seconds after the push, polls at 20s and 40s
    assert_eq!(remote.fetches(), 4);
    assert_eq!(remote.0.lock().unwrap().submitted.len(), 1);
    // last pull wins: the optimistic row is gone because the remote never stored it
    assert_eq!(l.transactions().len(), 1);
    assert_eq!(l.transactions()[0].id, "r1");
    assert_eq!(sync.status(), SyncStatus::Idle);
    drop(tx);
}

#[tokio::test(start_paused = true)]
async fn session_stops_on_shutdown_command_and_restarts_poll_on_new_endpoint() {
    let remote = FakeRemote::serving(json!([]));
    let mut l = ledger();
    let mut sync = client(&remote, None);
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::SetEndpoint(Some(ENDPOINT.to_string()))).unwrap();
    tx.send(SessionCommand::Shutdown).unwrap();

    Session::new(&mut l, &mut sync)
        .run(rx, std::future::pending::<()>())
        .await;

    // the endpoint change triggers one immediate pull before shutdown
    assert_eq!(remote.fetches(), 1);
    assert_eq!(sync.endpoint(), Some(ENDPOINT));
}

#[tokio::test]
async fn submit_still_pushes_when_local_mirror_fails() {
    let remote = FakeRemote::serving(json!([]));
    let mut l = ledger();
    l.connection().execute("DROP TABLE slots", []).unwrap();
    let mut sync = client(&remote, Some(ENDPOINT));

    let tx = Session::new(&mut l, &mut sync)
        .submit(draft("Abhishek", "Abhinav", "4"))
        .await
        .unwrap();

    let submitted = remote.0.lock().unwrap().submitted.clone();
    assert_eq!(submitted.len(), 1);
    let body: Value = serde_json::from_str(&submitted[0]).unwrap();
    assert_eq!(body["id"], tx.id.as_str());
    assert_eq!(l.transactions().len(), 1);
}

#[tokio::test]
async fn pushed_amount_is_numeric_while_stored_amount_is_exact() {
    let remote = FakeRemote::serving(json!([]));
    let mut l = ledger();
    let mut sync = client(&remote, Some(ENDPOINT));
    let tx = l.submit(draft("Abhishek", "Abhinav", "0.10")).unwrap();
    assert_eq!(sync.push(&tx).await, PushOutcome::Sent);

    let body: Value = serde_json::from_str(&remote.0.lock().unwrap().submitted[0]).unwrap();
    assert_eq!(body["amount"], 0.1);
    let stored = serde_json::to_value(&tx).unwrap();
    assert_eq!(stored["amount"], "0.10");
}
