// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::models::Transaction;

#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub name: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Filter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_name(tx) && self.matches_date(tx.date)
    }

    fn matches_name(&self, tx: &Transaction) -> bool {
        let needle = self.name.trim().to_lowercase();
        needle.is_empty()
            || tx.from.to_lowercase().contains(&needle)
            || tx.to.to_lowercase().contains(&needle)
    }

    /// `start` counts from 00:00 UTC; `end` runs through the whole day.
    fn matches_date(&self, date: DateTime<Utc>) -> bool {
        if let Some(start) = self.start.and_then(day_start) {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self
            .end
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .and_then(day_start)
        {
            if date >= end {
                return false;
            }
        }
        true
    }
}

fn day_start(d: NaiveDate) -> Option<DateTime<Utc>> {
    d.and_hms_opt(0, 0, 0).map(|n| n.and_utc())
}

pub fn filter_transactions<'a>(transactions: &'a [Transaction], filter: &Filter) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| filter.matches(t)).collect()
}

pub const CSV_HEADERS: [&str; 7] = ["Date", "From", "To", "Type", "Amount", "PaymentMethod", "Note"];

/// Write rows as fully quoted CSV. Returns `false` without writing anything
/// when there is nothing to export.
pub fn export_csv<W: Write>(rows: &[&Transaction], out: W) -> Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(out);
    wtr.write_record(CSV_HEADERS)?;
    for tx in rows {
        wtr.write_record([
            tx.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            tx.from.clone(),
            tx.to.clone(),
            tx.kind.to_string(),
            tx.amount.to_string(),
            tx.payment_method.map(|m| m.to_string()).unwrap_or_default(),
            tx.note.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(true)
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("cashflow_report_{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_embeds_date() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(export_filename(d), "cashflow_report_2025-09-01.csv");
    }
}
