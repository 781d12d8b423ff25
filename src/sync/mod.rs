// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod client;
pub mod engine;
pub mod normalize;
pub mod session;
pub mod status;

pub use client::{HttpRemote, RemoteLedger};
pub use engine::{PullOutcome, PullTrigger, PushOutcome, SyncClient, SyncSettings};
pub use session::{Session, SessionCommand};
pub use status::{StatusIndicator, SyncPhase, SyncStatus};
