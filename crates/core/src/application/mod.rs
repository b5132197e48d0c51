// Application Layer - Queue management and the services built around it

pub mod constants;
pub mod events;
pub mod gate;
pub mod match_lifecycle;
pub mod panic_guard;
pub mod queue_manager;
pub mod seeding;

// Re-exports
pub use constants::QueueDefaults;
pub use events::{Event, EventBus, MatchFinished, MatchStarted, Subscription};
pub use gate::ScopeGate;
pub use match_lifecycle::{LifecycleConfig, MatchLifecycle};
pub use queue_manager::{ManagerConfig, ManagerStats, Placement, PrunePolicy, QueueManager};
pub use seeding::{SeedReport, SeedService};
