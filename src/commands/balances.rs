// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::{BalanceEntry, compute_balances, sorted_balances};
use crate::store::Ledger;
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn rows(ledger: &Ledger) -> Vec<BalanceEntry> {
    sorted_balances(compute_balances(ledger.transactions(), ledger.parties()))
}

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    let data = rows(ledger);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let table_rows = data
        .iter()
        .map(|e| {
            let position = if e.balance > Decimal::ZERO {
                "is owed"
            } else if e.balance < Decimal::ZERO {
                "owes"
            } else {
                "settled"
            };
            vec![e.name.clone(), fmt_amount(&e.balance), position.to_string()]
        })
        .collect();
    println!("{}", pretty_table(&["Party", "Balance", "Position"], table_rows));
    Ok(())
}
