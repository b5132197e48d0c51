// Scope Registry - scope key -> ordered queue list

use crate::domain::{Queue, ScopeKey};
use std::collections::HashMap;

/// Queues of one scope plus the capacity new overflow queues receive
#[derive(Debug, Default)]
pub(crate) struct ScopeQueues {
    pub queues: Vec<Queue>,
    /// Fixed by the first queue created in the scope, cleared when the scope empties
    pub pinned_capacity: Option<usize>,
}

impl ScopeQueues {
    /// (queue index, slot index), both 0-based
    pub fn locate(&self, player_id: &str) -> Option<(usize, usize)> {
        self.queues
            .iter()
            .enumerate()
            .find_map(|(qi, queue)| queue.slot_of(player_id).map(|slot| (qi, slot)))
    }

    pub fn player_count(&self) -> usize {
        self.queues.iter().map(Queue::len).sum()
    }
}

/// Pure bookkeeping; no algorithm lives here
#[derive(Debug, Default)]
pub(crate) struct ScopeRegistry {
    scopes: HashMap<ScopeKey, ScopeQueues>,
}

impl ScopeRegistry {
    /// Entry with at least one queue
    pub fn get(&self, scope: &str) -> Option<&ScopeQueues> {
        self.scopes.get(scope).filter(|entry| !entry.queues.is_empty())
    }

    /// Mutable entry with at least one queue
    pub fn get_mut(&mut self, scope: &str) -> Option<&mut ScopeQueues> {
        self.scopes
            .get_mut(scope)
            .filter(|entry| !entry.queues.is_empty())
    }

    pub fn get_or_create(&mut self, scope: &str) -> &mut ScopeQueues {
        self.scopes.entry(scope.to_string()).or_default()
    }

    /// Drop the entry once it no longer holds any queue
    pub fn release_if_vacant(&mut self, scope: &str) {
        if self
            .scopes
            .get(scope)
            .is_some_and(|entry| entry.queues.is_empty())
        {
            self.scopes.remove(scope);
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ScopeQueues> {
        self.scopes.values().filter(|entry| !entry.queues.is_empty())
    }
}
