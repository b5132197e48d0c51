// Event Bus - in-process, type-keyed publish/subscribe

mod bus;
mod types;

pub use bus::{EventBus, Subscription};
pub use types::{MatchFinished, MatchStarted};

use std::any::Any;

/// Anything that can travel over the `EventBus`
pub trait Event: Any + Send + Sync {
    /// Stable name used in logs
    const NAME: &'static str;
}
