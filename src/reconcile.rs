// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Party, Transaction};

/// Promote every name referenced by a transaction to a party record.
///
/// Existing parties are never removed, and running this twice over the same
/// transactions adds nothing the second time. Returns the parties created.
pub fn reconcile_parties(parties: &mut Vec<Party>, transactions: &[Transaction]) -> Vec<Party> {
    let mut added = Vec::new();
    for t in transactions {
        for name in [t.from.trim(), t.to.trim()] {
            if name.is_empty() {
                continue;
            }
            if parties.iter().any(|p| p.matches(name)) {
                continue;
            }
            let party = Party::new(name);
            parties.push(party.clone());
            added.push(party);
        }
    }
    added
}
