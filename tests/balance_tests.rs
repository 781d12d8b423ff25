// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::balance::compute_balances;
use cashflow::models::{MAX_AMOUNT, Party, Transaction, TransactionKind};
use cashflow::reconcile::reconcile_parties;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;

fn parties(names: &[&str]) -> Vec<Party> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| Party {
            id: i.to_string(),
            name: n.to_string(),
        })
        .collect()
}

fn tx(from: &str, to: &str, amount: i64, kind: TransactionKind) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", from, to, amount),
        from: from.to_string(),
        to: to.to_string(),
        amount: Decimal::new(amount, 0),
        kind,
        payment_method: None,
        date: Utc::now(),
        note: String::new(),
    }
}

#[test]
fn discharge_lowers_sender_claim() {
    let b = compute_balances(
        &[tx("A", "B", 100, TransactionKind::Debit)],
        &parties(&["A", "B"]),
    );
    assert_eq!(b["A"], Decimal::new(-100, 0));
    assert_eq!(b["B"], Decimal::new(100, 0));
}

#[test]
fn credit_raises_sender_claim() {
    let b = compute_balances(
        &[tx("A", "B", 100, TransactionKind::Credit)],
        &parties(&["A", "B"]),
    );
    assert_eq!(b["A"], Decimal::new(100, 0));
    assert_eq!(b["B"], Decimal::new(-100, 0));
}

#[test]
fn empty_ledger_gives_zero_for_known_parties() {
    let b = compute_balances(&[], &parties(&["A", "B", "C"]));
    assert_eq!(b.len(), 3);
    assert!(b.values().all(|v| v.is_zero()));
}

#[test]
fn unknown_names_get_entries_and_balances_sum_to_zero() {
    let txs = vec![
        tx("A", "B", 100, TransactionKind::Credit),
        tx("B", "C", 35, TransactionKind::Debit),
        tx("C", "Dev", 12, TransactionKind::Credit),
        tx("Dev", "A", 7, TransactionKind::Debit),
        tx("A", "C", 250, TransactionKind::Debit),
    ];
    let b = compute_balances(&txs, &parties(&["A", "B"]));
    assert!(b.contains_key("Dev"));
    assert!(b.contains_key("C"));
    let total: Decimal = b.values().copied().sum();
    assert_eq!(total, Decimal::ZERO);
}

#[test]
fn reconcile_is_case_insensitive_and_idempotent() {
    let mut ps = parties(&["A"]);
    let txs = vec![
        tx("a", " b ", 1, TransactionKind::Credit),
        tx("B", "C", 1, TransactionKind::Debit),
    ];
    let added = reconcile_parties(&mut ps, &txs);
    let names: Vec<&str> = added.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["b", "C"]);

    let snapshot = ps.clone();
    assert!(reconcile_parties(&mut ps, &txs).is_empty());
    assert_eq!(ps, snapshot);
}

#[test]
fn reconcile_never_removes_parties() {
    let mut ps = parties(&["A", "Idle"]);
    reconcile_parties(&mut ps, &[tx("A", "B", 1, TransactionKind::Credit)]);
    assert!(ps.iter().any(|p| p.name == "Idle"));
    assert_eq!(ps.len(), 3);
}

#[test]
fn oversized_remote_amounts_do_not_overflow_balances() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    cashflow::db::init_schema(&conn).unwrap();
    let mut ledger = cashflow::store::Ledger::load(conn).unwrap();
    let max = "79228162514264337593543950335";
    ledger
        .replace_from_remote(&[
            json!({"from": "A", "to": "B", "amount": max, "type": "CREDIT"}),
            json!({"from": "A", "to": "B", "amount": max, "type": "CREDIT"}),
            json!({"from": "A", "to": "B", "amount": "1000000000000000", "type": "CREDIT"}),
        ])
        .unwrap();
    let b = compute_balances(ledger.transactions(), ledger.parties());
    assert_eq!(b["A"], MAX_AMOUNT);
    assert_eq!(b["B"], -MAX_AMOUNT);
}

#[test]
fn accumulation_at_the_decimal_limit_does_not_panic() {
    let mut big = tx("A", "B", 0, TransactionKind::Credit);
    big.amount = Decimal::MAX;
    let b = compute_balances(&[big.clone(), big], &parties(&["A", "B"]));
    assert_eq!(b["A"], Decimal::MAX);
    assert_eq!(b["B"], Decimal::MIN);
}
