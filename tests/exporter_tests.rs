// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::commands::exporter;
use cashflow::models::{PaymentMethod, Transaction, TransactionKind};
use cashflow::store::Ledger;
use cashflow::{cli, db};
use chrono::{NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn base_ledger() -> Ledger {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let mut ledger = Ledger::load(conn).unwrap();
    ledger
        .add_transaction(Transaction {
            id: "t1".into(),
            from: "Abhishek".into(),
            to: "Corner Shop".into(),
            amount: Decimal::new(1234, 2),
            kind: TransactionKind::Credit,
            payment_method: Some(PaymentMethod::Cash),
            date: Utc.with_ymd_and_hms(2025, 1, 2, 18, 30, 0).unwrap(),
            note: "Weekly \"run\"".into(),
        })
        .unwrap();
    ledger
}

fn export_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["cashflow", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    export_m.clone()
}

#[test]
fn export_writes_quoted_csv() {
    let ledger = base_ledger();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let today = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
    let written = exporter::export_transactions(&ledger, &export_matches(&["--out", &out_str]), today)
        .unwrap()
        .unwrap();
    assert_eq!(written, out_path);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#""Date","From","To","Type","Amount","PaymentMethod","Note""#,
            r#""2025-01-02 18:30:00","Abhishek","Corner Shop","CREDIT","12.34","CASH","Weekly ""run""""#,
        ]
    );
}

#[test]
fn export_with_no_matches_creates_no_file() {
    let ledger = base_ledger();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("empty.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let today = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
    let written = exporter::export_transactions(
        &ledger,
        &export_matches(&["--name", "nobody", "--out", &out_str]),
        today,
    )
    .unwrap();
    assert!(written.is_none());
    assert!(!out_path.exists());
}
