// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transport to the remote spreadsheet webhook.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::SyncError;
use crate::utils::http_client;

pub const CACHE_BUST_PARAM: &str = "_t";

/// Read/write access to the remote transaction list.
#[async_trait]
pub trait RemoteLedger: Send + Sync {
    /// Fetch the current list. Any JSON is returned; shape checks are the caller's.
    async fn fetch(&self, url: &Url) -> Result<Value, SyncError>;

    /// Send one JSON-encoded transaction. `Ok` only means the request left without
    /// a transport error; the response is not interpretable.
    async fn submit(&self, url: &Url, body: String) -> Result<(), SyncError>;
}

/// Parse and check an endpoint before any request is issued.
pub fn parse_endpoint(raw: &str) -> Result<Url, SyncError> {
    let invalid = |reason: String| SyncError::InvalidEndpoint {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

pub fn cache_busted(url: &Url, millis: i64) -> Url {
    let mut out = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != CACHE_BUST_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut q = out.query_pairs_mut();
        q.clear();
        for (k, v) in &kept {
            q.append_pair(k, v);
        }
        q.append_pair(CACHE_BUST_PARAM, &millis.to_string());
    }
    out
}

pub struct HttpRemote {
    client: Client,
}

impl HttpRemote {
    pub fn new() -> Result<Self, SyncError> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

#[async_trait]
impl RemoteLedger for HttpRemote {
    async fn fetch(&self, url: &Url) -> Result<Value, SyncError> {
        debug!(%url, "GET remote ledger");
        let resp = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SyncError::Status(resp.status().as_u16()));
        }
        Ok(resp.json::<Value>().await?)
    }

    async fn submit(&self, url: &Url, body: String) -> Result<(), SyncError> {
        debug!(%url, "POST remote ledger");
        let resp = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await?;
        debug!(status = resp.status().as_u16(), "Remote write sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_urls() {
        assert!(parse_endpoint("not a url").is_err());
        assert!(parse_endpoint("ftp://example.com/x").is_err());
        assert!(parse_endpoint(" https://example.com/exec ").is_ok());
    }

    #[test]
    fn cache_bust_replaces_previous_value() {
        let url = parse_endpoint("https://example.com/exec?sheet=main&_t=1").unwrap();
        let busted = cache_busted(&url, 42);
        assert_eq!(busted.as_str(), "https://example.com/exec?sheet=main&_t=42");
    }
}
