// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod balances;
pub mod exporter;
pub mod insight;
pub mod parties;
pub mod settings;
pub mod sync;
pub mod transactions;
