// Application constants (no magic values)

/// Capacity used when a caller supplies a non-positive one
pub const DEFAULT_CAPACITY: usize = 5;

/// Name given to the primary queue of a scope
pub const FIRST_QUEUE_NAME: &str = "Queue #1";

/// Window in which repeated match events for the same scope are ignored (3s)
pub const MATCH_EVENT_DEDUPE_WINDOW_MS: i64 = 3_000;

/// Synthetic players added by a seed request when no count is given
pub const DEFAULT_SEED_COUNT: usize = 12;

/// Upper bound for a single seed request
pub const MAX_SEED_COUNT: usize = 500;

/// Prefix of synthetic player ids when none is given
pub const DEFAULT_MOCK_PREFIX: &str = "mock";

/// Longest accepted mock prefix
pub const MAX_MOCK_PREFIX_LEN: usize = 32;

/// Defaults applied whenever a queue has to be created on a caller's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueDefaults {
    pub first_queue_name: String,
    pub capacity: usize,
}

impl Default for QueueDefaults {
    fn default() -> Self {
        Self {
            first_queue_name: FIRST_QUEUE_NAME.to_string(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}
