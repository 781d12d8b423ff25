// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::{PaymentMethod, TransactionDraft, TransactionKind};
use crate::store::Ledger;
use crate::sync::{
    HttpRemote, PullOutcome, PullTrigger, Session, SessionCommand, SyncClient,
};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub async fn handle(ledger: &mut Ledger, cfg: &mut AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("pull", _)) => pull(ledger, cfg).await?,
        Some(("watch", _)) => watch(ledger, cfg).await?,
        _ => {}
    }
    Ok(())
}

/// Resolve the endpoint (config endpoint included) and build a client for it.
pub async fn connect(cfg: &mut AppConfig) -> Result<SyncClient> {
    cfg.refresh_from_endpoint().await;
    let remote = HttpRemote::new()?;
    Ok(SyncClient::new(
        Box::new(remote),
        cfg.endpoint_url.clone(),
        cfg.sync,
    ))
}

async fn pull(ledger: &mut Ledger, cfg: &mut AppConfig) -> Result<()> {
    let mut sync = connect(cfg).await?;
    match sync.pull(ledger, PullTrigger::User).await {
        PullOutcome::Skipped => {
            println!("No endpoint configured; use `cashflow config set-endpoint <url>`")
        }
        PullOutcome::Replaced(n) => println!("Pulled {} transactions", n),
        PullOutcome::Ignored => println!("Remote returned unexpected data; nothing changed"),
        PullOutcome::Failed => println!("Sync failed ({}); nothing changed", sync.status()),
    }
    Ok(())
}

async fn watch(ledger: &mut Ledger, cfg: &mut AppConfig) -> Result<()> {
    let mut sync = connect(cfg).await?;
    if sync.endpoint().is_none() {
        println!("No endpoint configured; polling starts once one is set with `endpoint <url>`");
    }
    println!("Commands: pull | add <from> <to> <amount> [credit|debit] [note..] | rm <id> | endpoint <url|-> | quit");

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_command(&line) {
                Some(cmd) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => eprintln!("Unrecognized command: {}", line.trim()),
            }
        }
    });

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    Session::new(ledger, &mut sync).run(rx, shutdown).await;
    Ok(())
}

/// Parse one line typed into a watch session.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "pull" | "refresh" => Some(SessionCommand::Pull),
        "quit" | "exit" => Some(SessionCommand::Shutdown),
        "rm" => parts.next().map(|id| SessionCommand::Delete(id.to_string())),
        "endpoint" => match parts.next()? {
            "-" => Some(SessionCommand::SetEndpoint(None)),
            url => Some(SessionCommand::SetEndpoint(Some(url.to_string()))),
        },
        "add" => {
            let from = parts.next()?.to_string();
            let to = parts.next()?.to_string();
            let amount = parts.next()?.to_string();
            let rest: Vec<&str> = parts.collect();
            let (kind, note) = match rest.first().and_then(|k| k.parse::<TransactionKind>().ok()) {
                Some(kind) => (kind, rest[1..].join(" ")),
                None => (TransactionKind::default(), rest.join(" ")),
            };
            Some(SessionCommand::Submit(TransactionDraft {
                from,
                to,
                amount,
                kind,
                payment_method: PaymentMethod::General,
                note,
            }))
        }
        _ => None,
    }
}
