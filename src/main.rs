// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use cashflow::config::AppConfig;
use cashflow::store::Ledger;
use cashflow::{cli, commands, db};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cashflow=info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let mut cfg = AppConfig::resolve(&conn)?;
    let mut ledger = Ledger::load(conn)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("party", sub)) => commands::parties::handle(&mut ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, &mut cfg, sub).await?,
        Some(("balance", sub)) => commands::balances::handle(&ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&mut ledger, &mut cfg, sub).await?,
        Some(("insight", _)) => commands::insight::handle(&ledger, &cfg).await?,
        Some(("config", sub)) => commands::settings::handle(ledger.connection(), &cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
