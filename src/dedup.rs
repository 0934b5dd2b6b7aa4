use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::types::Notification;

/// Fold `incoming` into `existing`, keeping one notification per identity key.
///
/// The survivor for a key is the one with the latest `updated_at` (the earlier
/// one wins a tie). It is emitted at the position where the key first appeared,
/// so a later page refreshing a visible entry does not move it.
pub fn merge(existing: Vec<Notification>, incoming: Vec<Notification>) -> Vec<Notification> {
    let mut all = existing;
    all.extend(incoming);
    if all.is_empty() {
        return all;
    }

    let original = all.len();
    // slot order = first occurrence order; each slot holds the winner's index
    let slots: Vec<usize> = {
        let mut slot_of: HashMap<_, usize> = HashMap::with_capacity(all.len());
        let mut slots: Vec<usize> = Vec::with_capacity(all.len());
        for (i, n) in all.iter().enumerate() {
            match slot_of.entry(n.identity_key()) {
                Entry::Occupied(entry) => {
                    let slot = *entry.get();
                    if n.updated_at > all[slots[slot]].updated_at {
                        slots[slot] = i;
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(slots.len());
                    slots.push(i);
                }
            }
        }
        slots
    };

    let mut cells: Vec<Option<Notification>> = all.into_iter().map(Some).collect();
    let merged: Vec<Notification> = slots
        .into_iter()
        .filter_map(|i| cells[i].take())
        .collect();

    tracing::debug!(original, deduplicated = merged.len(), "merge");
    merged
}

/// Deduplicate a single list.
pub fn dedup(notifications: Vec<Notification>) -> Vec<Notification> {
    merge(notifications, Vec::new())
}
