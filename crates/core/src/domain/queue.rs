// Queue Domain Model

use super::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// External grouping key (one per chat channel in practice)
pub type ScopeKey = String;

/// Queue identifier, derived from scope + ordinal position
pub type QueueId = String;

/// Build the id of the queue at 1-based `ordinal` within `scope`
pub fn queue_id(scope: &str, ordinal: usize) -> QueueId {
    format!("{}:{}", scope, ordinal)
}

/// Display name given to queues created by overflow
pub fn overflow_name(ordinal: usize) -> String {
    format!("Queue #{}", ordinal)
}

/// Ordered, capacity-bounded waiting list
///
/// Front of `players` is the earliest joined player and the first to be promoted.
/// `Clone` is a deep copy, so every snapshot handed out is independent of manager state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    pub name: String,
    pub players: Vec<Player>,
    pub capacity: usize,
    pub created_at: i64, // epoch ms
}

impl Queue {
    pub fn new(
        scope: &str,
        ordinal: usize,
        name: impl Into<String>,
        capacity: usize,
        created_at: i64,
    ) -> Self {
        Self {
            id: queue_id(scope, ordinal),
            name: name.into(),
            players: Vec::with_capacity(capacity),
            capacity,
            created_at,
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.capacity
    }

    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.players.len())
    }

    /// 0-based slot of the player, if present
    pub fn slot_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().map(|p| &p.id)
    }
}
