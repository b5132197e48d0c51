// Queue compaction and housekeeping
//
// Pure functions over a scope's ordered queue list. Only called by `QueueManager`
// while it holds the registry write lock.

use crate::domain::{queue_id, Queue};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// What compaction may remove from the tail of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrunePolicy {
    /// Trailing empty queues go, the first queue always stays
    #[default]
    KeepFirst,
    /// Trailing empty queues go, including the first one
    RemoveAll,
}

impl fmt::Display for PrunePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrunePolicy::KeepFirst => write!(f, "keep-first"),
            PrunePolicy::RemoveAll => write!(f, "remove-all"),
        }
    }
}

impl FromStr for PrunePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep-first" | "keep_first" => Ok(PrunePolicy::KeepFirst),
            "remove-all" | "remove_all" => Ok(PrunePolicy::RemoveAll),
            other => Err(format!("unknown prune policy: {}", other)),
        }
    }
}

/// Fill earlier queues by pulling head players from later queues
///
/// For every adjacent pair starting at `from`, the head of queue `i+1` moves to the tail
/// of queue `i` while `i` has room. Passes repeat until nothing moves, so removals spread
/// over several queues still end fully compacted. Each move keeps the concatenated order of
/// all players intact, which is what makes promotion FIFO.
///
/// Returns the number of players promoted.
pub fn rebalance_forward(queues: &mut [Queue], from: usize) -> usize {
    let mut promoted = 0;

    loop {
        let mut moved = 0;
        for i in from..queues.len().saturating_sub(1) {
            let (head, tail) = queues.split_at_mut(i + 1);
            let current = &mut head[i];
            let next = &mut tail[0];

            let take = current.free_slots().min(next.len());
            if take > 0 {
                current.players.extend(next.players.drain(..take));
                moved += take;
            }
        }

        if moved == 0 {
            return promoted;
        }
        promoted += moved;
    }
}

/// Remove empty queues from the tail, stopping at the first non-empty one
///
/// Returns the number of queues removed.
pub fn prune_trailing_empty(queues: &mut Vec<Queue>, policy: PrunePolicy) -> usize {
    let keep = match policy {
        PrunePolicy::KeepFirst => 1,
        PrunePolicy::RemoveAll => 0,
    };

    let mut pruned = 0;
    while queues.len() > keep && queues.last().is_some_and(Queue::is_empty) {
        queues.pop();
        pruned += 1;
    }
    pruned
}

/// Re-derive ids from positions after queues shifted
pub fn relabel(queues: &mut [Queue], scope: &str) {
    for (idx, queue) in queues.iter_mut().enumerate() {
        queue.id = queue_id(scope, idx + 1);
    }
}

/// Describe the first violated invariant, if any
pub fn check_invariants(queues: &[Queue]) -> Result<(), String> {
    let mut seen = HashSet::new();

    for (idx, queue) in queues.iter().enumerate() {
        let position = idx + 1;

        if queue.capacity == 0 {
            return Err(format!("queue #{} has zero capacity", position));
        }
        if queue.len() > queue.capacity {
            return Err(format!(
                "queue #{} holds {} players over capacity {}",
                position,
                queue.len(),
                queue.capacity
            ));
        }
        for id in queue.player_ids() {
            if !seen.insert(id.as_str()) {
                return Err(format!("player {} appears more than once", id));
            }
        }
    }

    for pair in queues.windows(2) {
        if !pair[0].is_full() && !pair[1].is_empty() {
            return Err(format!(
                "{} has free slots while {} still has players",
                pair[0].id, pair[1].id
            ));
        }
    }

    if queues.len() > 1 && queues.last().is_some_and(Queue::is_empty) {
        return Err("trailing empty queue was not pruned".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Player;

    fn queue_with(ordinal: usize, capacity: usize, ids: &[&str]) -> Queue {
        let mut queue = Queue::new("scope", ordinal, format!("Queue #{}", ordinal), capacity, 0);
        for id in ids {
            queue.players.push(Player::new(*id, *id, 0));
        }
        queue
    }

    fn ids(queue: &Queue) -> Vec<&str> {
        queue.player_ids().map(String::as_str).collect()
    }

    #[test]
    fn test_rebalance_pulls_heads_in_order() {
        let mut queues = vec![
            queue_with(1, 3, &["a", "b"]),
            queue_with(2, 3, &["c", "d", "e"]),
            queue_with(3, 3, &["f"]),
        ];

        let promoted = rebalance_forward(&mut queues, 0);

        assert_eq!(promoted, 2);
        assert_eq!(ids(&queues[0]), vec!["a", "b", "c"]);
        assert_eq!(ids(&queues[1]), vec!["d", "e", "f"]);
        assert!(queues[2].is_empty());
    }

    #[test]
    fn test_rebalance_repeats_until_compacted() {
        // Removals spread over two queues need a second pass
        let mut queues = vec![
            queue_with(1, 5, &["a", "b"]),
            queue_with(2, 5, &["c"]),
            queue_with(3, 5, &["d", "e", "f", "g", "h"]),
        ];

        rebalance_forward(&mut queues, 0);
        prune_trailing_empty(&mut queues, PrunePolicy::KeepFirst);

        assert_eq!(ids(&queues[0]), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(ids(&queues[1]), vec!["f", "g", "h"]);
        assert_eq!(queues.len(), 2);
        assert_eq!(check_invariants(&queues), Ok(()));
    }

    #[test]
    fn test_rebalance_respects_from_index() {
        let mut queues = vec![
            queue_with(1, 3, &["a"]),
            queue_with(2, 3, &["b", "c"]),
            queue_with(3, 3, &["d"]),
        ];

        rebalance_forward(&mut queues, 1);

        assert_eq!(ids(&queues[0]), vec!["a"]);
        assert_eq!(ids(&queues[1]), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_prune_keep_first_leaves_one_queue() {
        let mut queues = vec![queue_with(1, 3, &[]), queue_with(2, 3, &[])];

        assert_eq!(prune_trailing_empty(&mut queues, PrunePolicy::KeepFirst), 1);
        assert_eq!(queues.len(), 1);
    }

    #[test]
    fn test_prune_remove_all_can_empty_scope() {
        let mut queues = vec![queue_with(1, 3, &[]), queue_with(2, 3, &[])];

        assert_eq!(prune_trailing_empty(&mut queues, PrunePolicy::RemoveAll), 2);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_prune_stops_at_non_empty() {
        let mut queues = vec![
            queue_with(1, 3, &["a", "b", "c"]),
            queue_with(2, 3, &["d"]),
            queue_with(3, 3, &[]),
        ];

        prune_trailing_empty(&mut queues, PrunePolicy::RemoveAll);
        assert_eq!(queues.len(), 2);
    }

    #[test]
    fn test_relabel_follows_positions() {
        let mut queues = vec![queue_with(2, 3, &[]), queue_with(3, 3, &[])];
        relabel(&mut queues, "chan");
        assert_eq!(queues[0].id, "chan:1");
        assert_eq!(queues[1].id, "chan:2");
    }

    #[test]
    fn test_check_invariants_reports_violations() {
        let over = vec![queue_with(1, 1, &["a", "b"])];
        assert!(check_invariants(&over).unwrap_err().contains("over capacity"));

        let duplicate = vec![queue_with(1, 2, &["a", "b"]), queue_with(2, 2, &["a"])];
        assert!(check_invariants(&duplicate)
            .unwrap_err()
            .contains("more than once"));

        let gap = vec![queue_with(1, 2, &["a"]), queue_with(2, 2, &["b"])];
        assert!(check_invariants(&gap).unwrap_err().contains("free slots"));

        let trailing = vec![queue_with(1, 1, &["a"]), queue_with(2, 1, &[])];
        assert!(check_invariants(&trailing)
            .unwrap_err()
            .contains("trailing empty"));

        let lone_empty = vec![queue_with(1, 5, &[])];
        assert_eq!(check_invariants(&lone_empty), Ok(()));
    }

    #[test]
    fn test_prune_policy_parsing() {
        assert_eq!("keep-first".parse::<PrunePolicy>(), Ok(PrunePolicy::KeepFirst));
        assert_eq!("REMOVE_ALL".parse::<PrunePolicy>(), Ok(PrunePolicy::RemoveAll));
        assert!("sometimes".parse::<PrunePolicy>().is_err());
        assert_eq!(PrunePolicy::RemoveAll.to_string(), "remove-all");
    }
}
