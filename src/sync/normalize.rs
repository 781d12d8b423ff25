// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Coercion of untrusted remote rows into typed transactions.
//!
//! Each field has a fixed fallback, so an element either becomes a complete
//! [`Transaction`] or is dropped. Elements are dropped only when they are not
//! objects or when they lack a sender or recipient name.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{MAX_AMOUNT, PaymentMethod, Transaction, TransactionKind};

pub fn normalize_all(values: &[Value], now: DateTime<Utc>) -> Vec<Transaction> {
    let out: Vec<Transaction> = values
        .iter()
        .enumerate()
        .filter_map(|(idx, v)| normalize_remote(idx, v, now))
        .collect();
    if out.len() < values.len() {
        warn!(
            dropped = values.len() - out.len(),
            "Dropped remote rows without an object shape or party names"
        );
    }
    out
}

pub fn normalize_remote(index: usize, value: &Value, now: DateTime<Utc>) -> Option<Transaction> {
    let obj = value.as_object()?;

    let from = text_field(obj.get("from"))?;
    let to = text_field(obj.get("to"))?;

    let id = text_field(obj.get("id"))
        .unwrap_or_else(|| format!("sheet-{}-{}", index, now.timestamp_millis()));
    let amount = obj.get("amount").map(coerce_amount).unwrap_or(Decimal::ZERO);
    let date = obj
        .get("date")
        .and_then(coerce_date)
        .unwrap_or(now);
    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<TransactionKind>().ok())
        .unwrap_or(TransactionKind::Debit);
    let payment_method = obj
        .get("paymentMethod")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<PaymentMethod>().ok());
    let note = obj
        .get("note")
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default();

    Some(Transaction {
        id,
        from,
        to,
        amount,
        kind,
        payment_method,
        date,
        note,
    })
}

fn text_field(v: Option<&Value>) -> Option<String> {
    let s = match v? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}

/// Numbers and numeric strings are taken as-is; anything else, including
/// negative values and values above [`MAX_AMOUNT`], becomes zero.
pub fn coerce_amount(v: &Value) -> Decimal {
    let parsed = match v {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .and_then(Decimal::from_f64)
            })
        }
        _ => None,
    };
    match parsed {
        Some(d) if d >= Decimal::ZERO && d <= MAX_AMOUNT => d,
        Some(d) => {
            debug!(amount = %d, "Out-of-range remote amount coerced to zero");
            Decimal::ZERO
        }
        None => Decimal::ZERO,
    }
}

pub fn coerce_date(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// RFC 3339, a bare `YYYY-MM-DD` (midnight UTC), or a naive date-time taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(n.and_utc());
        }
    }
    None
}
