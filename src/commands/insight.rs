// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::insight::InsightClient;
use crate::store::Ledger;
use anyhow::Result;

pub async fn handle(ledger: &Ledger, cfg: &AppConfig) -> Result<()> {
    let client = InsightClient::new(cfg.gemini_api_key.clone(), cfg.gemini_model.clone());
    if client.credential_missing() {
        println!("! GEMINI_API_KEY is missing. AI insights will not work until it is set.");
        return Ok(());
    }
    match client
        .generate(ledger.transactions(), &ledger.party_names())
        .await
    {
        Some(report) => {
            println!("Summary: {}", report.summary);
            println!("Advice:  {}", report.advice);
            println!("Total volume: {:.2}", report.total_volume);
        }
        None => println!("No insight available"),
    }
    Ok(())
}
