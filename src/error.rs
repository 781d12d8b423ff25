// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("submission rejected: {0}")]
    Rejected(Rejection),
}

/// Why a user submission was refused. State is left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidAmount,
    EmptySender,
    EmptyRecipient,
    SelfTransfer,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Rejection::InvalidAmount => {
                "amount must be a number greater than zero and at most 1000000000000000"
            }
            Rejection::EmptySender => "sender is empty",
            Rejection::EmptyRecipient => "recipient is empty",
            Rejection::SelfTransfer => "sender and recipient are the same party",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote returned status {0}")]
    Status(u16),

    #[error("could not encode transaction: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("GEMINI_API_KEY is not set")]
    MissingCredential,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gemini error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid gemini endpoint {0}")]
    InvalidEndpoint(String),

    #[error("gemini returned no text")]
    EmptyResponse,

    #[error("could not decode insight: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
