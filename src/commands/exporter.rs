// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use crate::commands::transactions::filter_from_matches;
use crate::store::Ledger;
use crate::view::{export_csv, export_filename, filter_transactions};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match export_transactions(ledger, m, Utc::now().date_naive())? {
        Some(path) => println!("Exported transactions to {}", path.display()),
        None => println!("Nothing to export for this filter"),
    }
    Ok(())
}

/// Writes the filtered view; returns `None` and creates no file when it is empty.
pub fn export_transactions(
    ledger: &Ledger,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Option<PathBuf>> {
    let filter = filter_from_matches(sub)?;
    let rows = filter_transactions(ledger.transactions(), &filter);
    if rows.is_empty() {
        return Ok(None);
    }
    let out = sub
        .get_one::<String>("out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(export_filename(today)));
    let file = std::fs::File::create(&out)
        .with_context(|| format!("Create export file {}", out.display()))?;
    export_csv(&rows, file)?;
    Ok(Some(out))
}
