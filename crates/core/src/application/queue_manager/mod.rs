//! Queue Manager - concurrency-safe, multi-queue admission and rebalancing
//!
//! Every scope owns an ordered list of capacity-bounded queues. Players join the first
//! queue with room; when all are full an overflow queue is appended. After every
//! departure, reset or delete the list is compacted so earlier queues stay as full as
//! the membership allows and trailing empty queues disappear.
//!
//! All mutating operations hold one write lock over the whole registry for their full
//! duration and never call out while holding it. Reads take the shared lock and return
//! owned copies, so callers can never observe or alias internal storage.

mod rebalance;
mod registry;


pub use rebalance::{check_invariants, prune_trailing_empty, rebalance_forward, PrunePolicy};

use crate::application::constants::DEFAULT_CAPACITY;
use crate::domain::error::Result;
use crate::domain::{overflow_name, Player, Queue, QueueError};
use crate::port::TimeProvider;
use rebalance::relabel;
use registry::{ScopeQueues, ScopeRegistry};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Manager tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    pub prune_policy: PrunePolicy,
    /// Capacity for overflow queues when the caller passes zero
    pub default_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            prune_policy: PrunePolicy::KeepFirst,
            default_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Where a player currently waits (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub position: usize,
    pub slot: usize,
}

/// Registry-wide counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManagerStats {
    pub scopes: usize,
    pub queues: usize,
    pub players: usize,
}

/// Outcome of one compaction run
#[derive(Debug, Clone, Copy, Default)]
struct Compaction {
    promoted: usize,
    pruned: usize,
}

/// Owner of every scope's queues (one per process, shared through `Arc`)
pub struct QueueManager {
    registry: RwLock<ScopeRegistry>,
    time_provider: Arc<dyn TimeProvider>,
    config: ManagerConfig,
}

impl QueueManager {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self::with_config(time_provider, ManagerConfig::default())
    }

    pub fn with_config(time_provider: Arc<dyn TimeProvider>, config: ManagerConfig) -> Self {
        Self {
            registry: RwLock::new(ScopeRegistry::default()),
            time_provider,
            config,
        }
    }

    /// Make sure queue #1 exists in the scope
    ///
    /// Creates it with `name` and `capacity` when the scope has no queues, otherwise
    /// returns the existing first queue untouched. Always returns a snapshot.
    pub fn ensure_first_queue(&self, scope: &str, name: &str, capacity: usize) -> Result<Queue> {
        let mut registry = self.write();

        if let Some(first) = registry.get(scope).and_then(|entry| entry.queues.first()) {
            return Ok(first.clone());
        }
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity { capacity });
        }

        let queue = Queue::new(scope, 1, name, capacity, self.time_provider.now_millis());
        let entry = registry.get_or_create(scope);
        entry.pinned_capacity = Some(capacity);
        entry.queues.push(queue.clone());

        info!(scope = %scope, name = %name, capacity, "First queue created");
        Ok(queue)
    }

    /// Deep-copy snapshot of every queue in the scope, in order
    pub fn queues(&self, scope: &str) -> Result<Vec<Queue>> {
        let registry = self.read();
        registry
            .get(scope)
            .map(|entry| entry.queues.clone())
            .ok_or_else(|| QueueError::scope_not_found(scope))
    }

    /// Admit the player into the first queue with room, growing the scope if needed
    ///
    /// Returns the 1-based position of the queue the player landed in. A player already
    /// waiting anywhere in the scope yields `AlreadyIn` with their current position and
    /// leaves state untouched.
    ///
    /// `overflow_capacity` only matters when the scope has no queue yet: the first queue
    /// pins the capacity every later overflow queue of the scope receives.
    pub fn join_any(
        &self,
        scope: &str,
        player_id: &str,
        display_name: &str,
        overflow_capacity: usize,
    ) -> Result<usize> {
        let mut registry = self.write();
        let entry = registry.get_or_create(scope);

        if let Some((qi, _)) = entry.locate(player_id) {
            return Err(QueueError::AlreadyIn {
                player_id: player_id.to_string(),
                position: qi + 1,
            });
        }

        let now = self.time_provider.now_millis();
        let player = Player::new(player_id, display_name, now);

        if let Some(qi) = entry.queues.iter().position(|queue| !queue.is_full()) {
            entry.queues[qi].players.push(player);
            debug!(scope = %scope, player_id = %player_id, position = qi + 1, "Player joined");
            return Ok(qi + 1);
        }

        let fallback = if overflow_capacity > 0 {
            overflow_capacity
        } else {
            self.config.default_capacity
        };
        let capacity = *entry.pinned_capacity.get_or_insert(fallback);
        let ordinal = entry.queues.len() + 1;

        let mut queue = Queue::new(scope, ordinal, overflow_name(ordinal), capacity, now);
        queue.players.push(player);
        entry.queues.push(queue);

        info!(
            scope = %scope,
            player_id = %player_id,
            position = ordinal,
            capacity,
            "Overflow queue created"
        );
        debug_assert_eq!(
            check_invariants(&entry.queues),
            Ok(()),
            "queue invariants violated in scope {}",
            scope
        );
        Ok(ordinal)
    }

    /// Remove the player from whichever queue holds them, then compact
    ///
    /// Returns the 1-based position the player was removed from (before promotion).
    pub fn leave_any(&self, scope: &str, player_id: &str) -> Result<usize> {
        let mut registry = self.write();
        let entry = registry
            .get_mut(scope)
            .ok_or_else(|| QueueError::scope_not_found(scope))?;

        let (qi, slot) = entry.locate(player_id).ok_or_else(|| QueueError::NotIn {
            player_id: player_id.to_string(),
        })?;
        entry.queues[qi].players.remove(slot);

        let outcome = self.compact(scope, entry, qi);
        registry.release_if_vacant(scope);

        debug!(
            scope = %scope,
            player_id = %player_id,
            position = qi + 1,
            promoted = outcome.promoted,
            pruned = outcome.pruned,
            "Player left"
        );
        Ok(qi + 1)
    }

    /// Clear the players of queue `index` (1-based) without removing the queue
    pub fn reset_at(&self, scope: &str, index: usize) -> Result<()> {
        let mut registry = self.write();
        let entry = Self::entry_with_index(&mut registry, scope, index)?;

        let cleared = std::mem::take(&mut entry.queues[index - 1].players).len();

        let outcome = self.compact(scope, entry, index - 1);
        registry.release_if_vacant(scope);

        info!(
            scope = %scope,
            index,
            cleared,
            promoted = outcome.promoted,
            pruned = outcome.pruned,
            "Queue reset"
        );
        Ok(())
    }

    /// Remove queue `index` (1-based); later queues shift down and are relabelled
    pub fn delete_at(&self, scope: &str, index: usize) -> Result<()> {
        let mut registry = self.write();
        let entry = Self::entry_with_index(&mut registry, scope, index)?;

        let removed = entry.queues.remove(index - 1);
        relabel(&mut entry.queues, scope);

        // One queue before the removal point, to refill across the seam
        let outcome = self.compact(scope, entry, index.saturating_sub(2));
        registry.release_if_vacant(scope);

        info!(
            scope = %scope,
            index,
            dropped_players = removed.len(),
            promoted = outcome.promoted,
            pruned = outcome.pruned,
            "Queue deleted"
        );
        Ok(())
    }

    /// Take up to `count` players from the head of queue #1, then compact
    pub fn pop_from_first(&self, scope: &str, count: usize) -> Result<Vec<Player>> {
        let mut registry = self.write();
        let entry = registry
            .get_mut(scope)
            .ok_or_else(|| QueueError::scope_not_found(scope))?;

        if count == 0 {
            return Ok(Vec::new());
        }

        let first = &mut entry.queues[0];
        let take = count.min(first.len());
        let popped: Vec<Player> = first.players.drain(..take).collect();

        let outcome = self.compact(scope, entry, 0);
        registry.release_if_vacant(scope);

        info!(
            scope = %scope,
            popped = popped.len(),
            promoted = outcome.promoted,
            "Players popped from first queue"
        );
        Ok(popped)
    }

    /// Remove every player matching `predicate` in a single critical section
    ///
    /// The predicate runs under the write lock and must not call back into the manager.
    pub fn remove_matching<F>(&self, scope: &str, mut predicate: F) -> Result<usize>
    where
        F: FnMut(&Player) -> bool,
    {
        let mut registry = self.write();
        let entry = registry
            .get_mut(scope)
            .ok_or_else(|| QueueError::scope_not_found(scope))?;

        let mut removed = 0;
        let mut earliest = None;
        for (qi, queue) in entry.queues.iter_mut().enumerate() {
            let before = queue.len();
            queue.players.retain(|player| !predicate(player));
            let gone = before - queue.len();
            if gone > 0 {
                removed += gone;
                earliest.get_or_insert(qi);
            }
        }

        if let Some(from) = earliest {
            let outcome = self.compact(scope, entry, from);
            registry.release_if_vacant(scope);
            info!(
                scope = %scope,
                removed,
                promoted = outcome.promoted,
                pruned = outcome.pruned,
                "Players removed in bulk"
            );
        }
        Ok(removed)
    }

    /// Current placement of a player, if waiting in the scope
    pub fn locate(&self, scope: &str, player_id: &str) -> Option<Placement> {
        let registry = self.read();
        registry
            .get(scope)
            .and_then(|entry| entry.locate(player_id))
            .map(|(qi, slot)| Placement {
                position: qi + 1,
                slot: slot + 1,
            })
    }

    pub fn stats(&self) -> ManagerStats {
        let registry = self.read();
        registry
            .entries()
            .fold(ManagerStats::default(), |mut stats, entry| {
                stats.scopes += 1;
                stats.queues += entry.queues.len();
                stats.players += entry.player_count();
                stats
            })
    }

    fn entry_with_index<'a>(
        registry: &'a mut ScopeRegistry,
        scope: &str,
        index: usize,
    ) -> Result<&'a mut ScopeQueues> {
        let entry = registry
            .get_mut(scope)
            .ok_or_else(|| QueueError::scope_not_found(scope))?;
        if index == 0 || index > entry.queues.len() {
            return Err(QueueError::index_not_found(scope, index));
        }
        Ok(entry)
    }

    fn compact(&self, scope: &str, entry: &mut ScopeQueues, from: usize) -> Compaction {
        let promoted = rebalance_forward(&mut entry.queues, from);
        let pruned = prune_trailing_empty(&mut entry.queues, self.config.prune_policy);
        if entry.queues.is_empty() {
            entry.pinned_capacity = None;
        }

        debug_assert_eq!(
            check_invariants(&entry.queues),
            Ok(()),
            "queue invariants violated in scope {}",
            scope
        );
        Compaction { promoted, pruned }
    }

    fn read(&self) -> RwLockReadGuard<'_, ScopeRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ScopeRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}
