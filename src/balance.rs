// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::models::{Party, Transaction, TransactionKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceEntry {
    pub name: String,
    pub balance: Decimal,
}

/// Net position per name. Every known party is present even without activity,
/// as is every name referenced by a transaction. A step that would overflow
/// `Decimal` is skipped for that name.
pub fn compute_balances(
    transactions: &[Transaction],
    parties: &[Party],
) -> HashMap<String, Decimal> {
    let mut stats: HashMap<String, Decimal> = parties
        .iter()
        .map(|p| (p.name.clone(), Decimal::ZERO))
        .collect();
    for t in transactions {
        stats.entry(t.from.clone()).or_insert(Decimal::ZERO);
        stats.entry(t.to.clone()).or_insert(Decimal::ZERO);
    }

    for t in transactions {
        let signed = match t.kind {
            TransactionKind::Credit => t.amount,
            TransactionKind::Debit => -t.amount,
        };
        if let Some(b) = stats.get_mut(&t.from) {
            match b.checked_add(signed) {
                Some(v) => *b = v,
                None => warn!(name = %t.from, id = %t.id, "Balance overflow, transaction skipped"),
            }
        }
        if let Some(b) = stats.get_mut(&t.to) {
            match b.checked_sub(signed) {
                Some(v) => *b = v,
                None => warn!(name = %t.to, id = %t.id, "Balance overflow, transaction skipped"),
            }
        }
    }
    stats
}

/// Presentation order: largest claim first, ties by name.
pub fn sorted_balances(balances: HashMap<String, Decimal>) -> Vec<BalanceEntry> {
    let mut out: Vec<BalanceEntry> = balances
        .into_iter()
        .map(|(name, balance)| BalanceEntry { name, balance })
        .collect();
    out.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.name.cmp(&b.name)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_by_balance_then_name() {
        let mut m = HashMap::new();
        m.insert("b".to_string(), Decimal::new(5, 0));
        m.insert("a".to_string(), Decimal::new(5, 0));
        m.insert("c".to_string(), Decimal::new(-10, 0));
        let names: Vec<String> = sorted_balances(m).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
