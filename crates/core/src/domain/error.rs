// Queue Error Types
//
// Every variant is an expected, recoverable condition. Callers branch on `kind()`
// rather than on the rendered message.

use super::player::PlayerId;
use super::queue::ScopeKey;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("{}", not_found_message(.scope, .index))]
    NotFound {
        scope: ScopeKey,
        /// 1-based index that was requested, if any
        index: Option<usize>,
    },

    #[error("Player {player_id} is already in queue #{position}")]
    AlreadyIn { player_id: PlayerId, position: usize },

    #[error("Player {player_id} is not in any queue")]
    NotIn { player_id: PlayerId },

    #[error("Invalid capacity: {capacity} (must be positive)")]
    InvalidCapacity { capacity: usize },
}

fn not_found_message(scope: &str, index: &Option<usize>) -> String {
    match index {
        Some(idx) => format!("Queue #{} not found in scope {}", idx, scope),
        None => format!("No queues in scope {}", scope),
    }
}

/// Comparable tag for `QueueError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueErrorKind {
    NotFound,
    AlreadyIn,
    NotIn,
    InvalidCapacity,
}

impl QueueError {
    pub fn scope_not_found(scope: &str) -> Self {
        QueueError::NotFound {
            scope: scope.to_string(),
            index: None,
        }
    }

    pub fn index_not_found(scope: &str, index: usize) -> Self {
        QueueError::NotFound {
            scope: scope.to_string(),
            index: Some(index),
        }
    }

    pub fn kind(&self) -> QueueErrorKind {
        match self {
            QueueError::NotFound { .. } => QueueErrorKind::NotFound,
            QueueError::AlreadyIn { .. } => QueueErrorKind::AlreadyIn,
            QueueError::NotIn { .. } => QueueErrorKind::NotIn,
            QueueError::InvalidCapacity { .. } => QueueErrorKind::InvalidCapacity,
        }
    }

    pub fn is(&self, kind: QueueErrorKind) -> bool {
        self.kind() == kind
    }

    /// Existing 1-based position carried by `AlreadyIn`
    pub fn position(&self) -> Option<usize> {
        match self {
            QueueError::AlreadyIn { position, .. } => Some(*position),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, QueueError>;
