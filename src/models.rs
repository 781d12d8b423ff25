// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub name: String,
}

impl Party {
    pub fn new(name: &str) -> Self {
        Self {
            id: new_id(),
            name: name.trim().to_string(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Direction of a transfer.
///
/// `Credit`: the sender is owed, so the sender's claim grows.
/// `Debit`: the sender discharges an obligation, so the sender's claim shrinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    #[default]
    #[serde(alias = "claim", alias = "credit")]
    Credit,
    #[serde(alias = "discharge", alias = "debit")]
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "CREDIT",
            TransactionKind::Debit => "DEBIT",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" | "claim" => Ok(TransactionKind::Credit),
            "debit" | "discharge" => Ok(TransactionKind::Debit),
            other => Err(format!("Unknown transaction type '{}' (use credit|debit)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    Bank,
    General,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Bank => "BANK",
            PaymentMethod::General => "GENERAL",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "bank" => Ok(PaymentMethod::Bank),
            "general" => Ok(PaymentMethod::General),
            other => Err(format!("Unknown payment method '{}' (use cash|bank|general)", other)),
        }
    }
}

/// Largest amount accepted from a user or from the remote sheet (10^15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// A recorded transfer. Field names match the remote sheet columns.
///
/// The amount serializes as an exact decimal string; [`WireTransaction`] is the
/// numeric form sent to the remote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(
        rename = "paymentMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_method: Option<PaymentMethod>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
}

/// Outgoing shape of a transaction, with `amount` as a JSON number.
#[derive(Debug, Serialize)]
pub struct WireTransaction<'a> {
    pub id: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(rename = "paymentMethod", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub date: DateTime<Utc>,
    pub note: &'a str,
}

impl<'a> From<&'a Transaction> for WireTransaction<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            id: &tx.id,
            from: &tx.from,
            to: &tx.to,
            amount: tx.amount,
            kind: tx.kind,
            payment_method: tx.payment_method,
            date: tx.date,
            note: &tx.note,
        }
    }
}

/// A user submission before validation; `amount` is kept as typed.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub from: String,
    pub to: String,
    pub amount: String,
    pub kind: TransactionKind,
    pub payment_method: PaymentMethod,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub summary: String,
    pub advice: String,
    pub total_volume: f64,
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_amount_is_ten_to_the_fifteenth() {
        assert_eq!(MAX_AMOUNT.to_string(), "1000000000000000");
    }
}
