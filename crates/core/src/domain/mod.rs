// Domain Layer - Pure records and error taxonomy

pub mod error;
pub mod player;
pub mod queue;

// Re-exports
pub use error::{QueueError, QueueErrorKind};
pub use player::{Player, PlayerId};
pub use queue::{overflow_name, queue_id, Queue, QueueId, ScopeKey};
