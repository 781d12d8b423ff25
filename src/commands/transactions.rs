// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::sync::connect;
use crate::config::AppConfig;
use crate::models::{PaymentMethod, TransactionDraft, TransactionKind};
use crate::store::Ledger;
use crate::sync::{PullTrigger, PushOutcome};
use crate::utils::{fmt_amount, maybe_print_json, parse_date, pretty_table};
use crate::view::{Filter, filter_transactions};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub async fn handle(ledger: &mut Ledger, cfg: &mut AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, cfg, sub).await?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            if ledger.delete_transaction(id)? {
                println!("Deleted transaction {} (local only)", id);
            } else {
                println!("No transaction with id {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn draft_from_matches(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let kind = sub
        .get_one::<String>("kind")
        .map(|s| s.parse::<TransactionKind>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or(TransactionKind::Credit);
    let payment_method = sub
        .get_one::<String>("method")
        .map(|s| s.parse::<PaymentMethod>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or(PaymentMethod::General);
    Ok(TransactionDraft {
        from: sub.get_one::<String>("from").cloned().unwrap_or_default(),
        to: sub.get_one::<String>("to").cloned().unwrap_or_default(),
        amount: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        kind,
        payment_method,
        note: sub.get_one::<String>("note").cloned().unwrap_or_default(),
    })
}

async fn add(ledger: &mut Ledger, cfg: &mut AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_matches(sub)?;
    let tx = match ledger.record(draft) {
        Ok(tx) => tx,
        Err(why) => {
            println!("Not recorded: {}", why);
            return Ok(());
        }
    };
    println!(
        "Recorded {} {} -> {} ({}, id {})",
        fmt_amount(&tx.amount),
        tx.from,
        tx.to,
        tx.kind,
        tx.id
    );

    let mut sync = connect(cfg).await?;
    match sync.push(&tx).await {
        PushOutcome::Skipped => {}
        PushOutcome::Failed => println!("Sync failed; kept locally"),
        PushOutcome::Sent => {
            println!("Synced");
            tokio::time::sleep(sync.settings().repull_delay).await;
            sync.pull(ledger, PullTrigger::Background).await;
        }
    }
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.from.clone(),
                    r.to.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.method.clone(),
                    r.note.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "From", "To", "Type", "Amount", "Method", "Note", "Id"],
                rows,
            )
        );
        if let Some(at) = ledger.last_updated() {
            println!("Updated: {}", at.format("%H:%M:%S"));
        }
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub from: String,
    pub to: String,
    pub kind: String,
    pub amount: String,
    pub method: String,
    pub note: String,
}

pub fn filter_from_matches(sub: &clap::ArgMatches) -> Result<Filter> {
    Ok(Filter {
        name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
        start: sub
            .get_one::<String>("from-date")
            .map(|s| parse_date(s))
            .transpose()?,
        end: sub
            .get_one::<String>("to-date")
            .map(|s| parse_date(s))
            .transpose()?,
    })
}

pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = filter_from_matches(sub)?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    Ok(filter_transactions(ledger.transactions(), &filter)
        .into_iter()
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.format("%Y-%m-%d %H:%M").to_string(),
            from: t.from.clone(),
            to: t.to.clone(),
            kind: t.kind.to_string(),
            amount: fmt_amount(&t.amount),
            method: t.payment_method.map(|m| m.to_string()).unwrap_or_default(),
            note: t.note.clone(),
        })
        .collect())
}
