// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration.
//!
//! Sources, later ones winning: built-in defaults, the `settings` table,
//! environment variables, and finally the optional config endpoint, which is
//! fetched once at startup and may only supply the remote endpoint url.

use std::time::Duration;

use anyhow::Result;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::{get_setting, set_setting};
use crate::error::SyncError;
use crate::sync::SyncSettings;
use crate::sync::client::parse_endpoint;
use crate::utils::http_client;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

pub const KEY_ENDPOINT_URL: &str = "endpoint_url";
pub const KEY_CONFIG_URL: &str = "config_url";
pub const KEY_GEMINI_MODEL: &str = "gemini_model";

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub endpoint_url: Option<String>,
    pub config_url: Option<String>,
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    #[serde(skip)]
    pub sync: SyncSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            config_url: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            sync: SyncSettings::default(),
        }
    }
}

/// Body of the config endpoint. Older deployments send `gsheetUrl`.
#[derive(Debug, Default, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, alias = "gsheetUrl")]
    pub endpoint_url: Option<String>,
}

impl AppConfig {
    pub fn resolve(conn: &Connection) -> Result<Self> {
        Self::from_sources(conn, |k| std::env::var(k).ok())
    }

    pub fn from_sources<F>(conn: &Connection, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |k: &str| env(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get_setting(conn, KEY_ENDPOINT_URL)? {
            cfg.endpoint_url = Some(v);
        }
        if let Some(v) = get_setting(conn, KEY_CONFIG_URL)? {
            cfg.config_url = Some(v);
        }
        if let Some(v) = get_setting(conn, KEY_GEMINI_MODEL)? {
            cfg.gemini_model = v;
        }

        if let Some(v) = env("CASHFLOW_ENDPOINT_URL") {
            cfg.endpoint_url = Some(v);
        }
        if let Some(v) = env("CASHFLOW_CONFIG_URL") {
            cfg.config_url = Some(v);
        }
        cfg.gemini_api_key = env("GEMINI_API_KEY").or_else(|| env("API_KEY"));
        if let Some(v) = env("GEMINI_MODEL") {
            cfg.gemini_model = v;
        }
        if let Some(v) = env("CASHFLOW_POLL_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.sync.poll_interval = Duration::from_secs(secs),
                _ => warn!(value = %v, "Ignoring invalid CASHFLOW_POLL_SECS"),
            }
        }
        Ok(cfg)
    }

    /// Returns true if the remote config changed the endpoint.
    pub fn apply_remote(&mut self, remote: RemoteConfig) -> bool {
        match remote.endpoint_url.map(|u| u.trim().to_string()) {
            Some(url) if !url.is_empty() && self.endpoint_url.as_deref() != Some(url.as_str()) => {
                self.endpoint_url = Some(url);
                true
            }
            _ => false,
        }
    }

    /// Fetch the config endpoint if one is set. Failures keep the current endpoint.
    pub async fn refresh_from_endpoint(&mut self) -> bool {
        let Some(url) = self.config_url.clone() else {
            return false;
        };
        match fetch_remote_config(&url).await {
            Ok(remote) => self.apply_remote(remote),
            Err(e) => {
                warn!(error = %e, "Config fetch failed, keeping current endpoint");
                false
            }
        }
    }
}

pub async fn fetch_remote_config(url: &str) -> Result<RemoteConfig, SyncError> {
    let url = parse_endpoint(url)?;
    debug!(%url, "Fetching config");
    let resp = http_client()?.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(SyncError::Status(resp.status().as_u16()));
    }
    Ok(resp.json::<RemoteConfig>().await?)
}

pub fn save_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    set_setting(conn, key, value)?;
    Ok(())
}
