// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{AppConfig, KEY_CONFIG_URL, KEY_ENDPOINT_URL, KEY_GEMINI_MODEL, save_setting};
use crate::sync::client::parse_endpoint;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(cfg),
        Some(("set-endpoint", sub)) => {
            let url = sub.get_one::<String>("url").unwrap();
            parse_endpoint(url)?;
            save_setting(conn, KEY_ENDPOINT_URL, url.trim())?;
            println!("Remote endpoint set to {}", url.trim());
        }
        Some(("set-config-url", sub)) => {
            let url = sub.get_one::<String>("url").unwrap();
            parse_endpoint(url)?;
            save_setting(conn, KEY_CONFIG_URL, url.trim())?;
            println!("Config url set to {}", url.trim());
        }
        Some(("set-model", sub)) => {
            let model = sub.get_one::<String>("model").unwrap();
            save_setting(conn, KEY_GEMINI_MODEL, model.trim())?;
            println!("Gemini model set to {}", model.trim());
        }
        _ => {}
    }
    Ok(())
}

fn show(cfg: &AppConfig) {
    let rows = vec![
        vec![
            "endpoint_url".to_string(),
            cfg.endpoint_url.clone().unwrap_or_else(|| "(none)".into()),
        ],
        vec![
            "config_url".to_string(),
            cfg.config_url.clone().unwrap_or_else(|| "(none)".into()),
        ],
        vec![
            "gemini_api_key".to_string(),
            if cfg.gemini_api_key.is_some() { "set" } else { "missing" }.to_string(),
        ],
        vec!["gemini_model".to_string(), cfg.gemini_model.clone()],
        vec![
            "poll_interval".to_string(),
            format!("{}s", cfg.sync.poll_interval.as_secs()),
        ],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
}
