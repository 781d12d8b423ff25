// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Ledger;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            match ledger.add_party(name)? {
                Some(p) => println!("Added party '{}'", p.name),
                None => println!("Party '{}' already exists or is blank", name.trim()),
            }
        }
        Some(("list", sub)) => {
            let parties = ledger.parties();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &parties)? {
                let rows = parties
                    .iter()
                    .map(|p| vec![p.name.clone(), p.id.clone()])
                    .collect();
                println!("{}", pretty_table(&["Party", "Id"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
