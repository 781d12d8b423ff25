// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Natural-language summaries from Gemini.
//!
//! The service is optional. Every failure, including a missing API key, comes
//! back as `None` so the rest of the ledger keeps working.

use reqwest::{Client, Url};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::InsightError;
use crate::models::{InsightReport, Transaction, WireTransaction};
use crate::utils::http_client;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

pub struct InsightClient {
    api_key: Option<String>,
    model: String,
}

impl InsightClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
        }
    }

    /// True when no API key is available; shown as a standing banner.
    pub fn credential_missing(&self) -> bool {
        self.api_key.is_none()
    }

    pub async fn generate(
        &self,
        transactions: &[Transaction],
        party_names: &[String],
    ) -> Option<InsightReport> {
        if transactions.is_empty() {
            return None;
        }
        match self.try_generate(transactions, party_names).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "Error fetching Gemini insights");
                None
            }
        }
    }

    async fn try_generate(
        &self,
        transactions: &[Transaction],
        party_names: &[String],
    ) -> Result<InsightReport, InsightError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(InsightError::MissingCredential)?;
        let url = self.endpoint(api_key)?;
        let payload = request_body(&build_prompt(transactions, party_names)?);

        let client: Client = http_client()?;
        debug!(model = %self.model, "Requesting insight");
        let response = client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status,
                body: body.chars().take(320).collect(),
            });
        }
        let body: Value = response.json().await?;
        parse_response(&body)
    }

    fn endpoint(&self, api_key: &str) -> Result<Url, InsightError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            GEMINI_ENDPOINT,
            self.model
        );
        let mut url =
            Url::parse(&raw).map_err(|e| InsightError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

pub fn build_prompt(
    transactions: &[Transaction],
    party_names: &[String],
) -> Result<String, InsightError> {
    let wire: Vec<WireTransaction> = transactions.iter().map(WireTransaction::from).collect();
    Ok(format!(
        "Analyze the following cash flow transactions between parties: {}.\n\
         Transactions: {}\n\n\
         Provide a concise summary of the financial relationship, identify who owes the most, \
         and give one piece of friendly financial advice.",
        party_names.join(", "),
        serde_json::to_string(&wire)?
    ))
}

pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            { "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "summary": { "type": "STRING" },
                    "advice": { "type": "STRING" },
                    "totalVolume": { "type": "NUMBER" }
                },
                "required": ["summary", "advice", "totalVolume"]
            }
        }
    })
}

/// Pull the JSON report out of the first candidate's text parts.
pub fn parse_response(body: &Value) -> Result<InsightReport, InsightError> {
    let text = body["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(InsightError::EmptyResponse);
    }
    Ok(serde_json::from_str(text.trim())?)
}
