// Match Lifecycle - reacts to match events on the bus
//
// Start: ensure queue #1, draft its head into the match, open the gate.
// Finish: close the gate.
// Repeated events for the same scope inside the dedupe window are ignored.

use crate::application::constants::{QueueDefaults, MATCH_EVENT_DEDUPE_WINDOW_MS};
use crate::application::events::{EventBus, MatchFinished, MatchStarted, Subscription};
use crate::application::gate::ScopeGate;
use crate::application::queue_manager::QueueManager;
use crate::domain::Player;
use crate::error::Result;
use crate::port::TimeProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    pub defaults: QueueDefaults,
    /// Players drafted from queue #1 when a match starts
    pub pop_count: usize,
    pub dedupe_window_ms: i64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        let defaults = QueueDefaults::default();
        Self {
            pop_count: defaults.capacity,
            defaults,
            dedupe_window_ms: MATCH_EVENT_DEDUPE_WINDOW_MS,
        }
    }
}

pub struct MatchLifecycle {
    manager: Arc<QueueManager>,
    gate: Arc<ScopeGate>,
    time_provider: Arc<dyn TimeProvider>,
    config: LifecycleConfig,
    recent: Mutex<HashMap<String, i64>>,
}

impl MatchLifecycle {
    pub fn new(
        manager: Arc<QueueManager>,
        gate: Arc<ScopeGate>,
        time_provider: Arc<dyn TimeProvider>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            manager,
            gate,
            time_provider,
            config,
            recent: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to both match events; handlers live as long as the returned subscriptions
    pub fn attach(self: &Arc<Self>, bus: &EventBus) -> Vec<Subscription> {
        let on_start = Arc::clone(self);
        let on_finish = Arc::clone(self);

        let subscriptions = vec![
            bus.subscribe(move |event: &MatchStarted| {
                if let Err(e) = on_start.on_match_started(event) {
                    error!(scope = %event.scope, error = %e, "Match start handling failed");
                }
            }),
            bus.subscribe(move |event: &MatchFinished| {
                on_finish.on_match_finished(event);
            }),
        ];

        info!(
            match_started = bus.subscriber_count::<MatchStarted>(),
            match_finished = bus.subscriber_count::<MatchFinished>(),
            "Match lifecycle attached"
        );
        subscriptions
    }

    /// Returns the drafted players, or `None` when the event was a duplicate
    pub fn on_match_started(&self, event: &MatchStarted) -> Result<Option<Vec<Player>>> {
        if event.scope.is_empty() {
            warn!(match_id = %event.match_id, "Match start without scope ignored");
            return Ok(None);
        }
        if self.recently_handled(&format!("start:{}", event.scope)) {
            debug!(scope = %event.scope, match_id = %event.match_id, "Duplicate match start ignored");
            return Ok(None);
        }

        let defaults = &self.config.defaults;
        self.manager
            .ensure_first_queue(&event.scope, &defaults.first_queue_name, defaults.capacity)?;
        let drafted = self
            .manager
            .pop_from_first(&event.scope, self.config.pop_count)?;
        self.gate.set(&event.scope, true);

        info!(
            scope = %event.scope,
            match_id = %event.match_id,
            drafted = drafted.len(),
            "Match started, gate open"
        );
        Ok(Some(drafted))
    }

    /// Returns false when the event was a duplicate
    pub fn on_match_finished(&self, event: &MatchFinished) -> bool {
        if event.scope.is_empty() {
            warn!(match_id = %event.match_id, "Match finish without scope ignored");
            return false;
        }
        if self.recently_handled(&format!("finish:{}", event.scope)) {
            debug!(scope = %event.scope, match_id = %event.match_id, "Duplicate match finish ignored");
            return false;
        }

        self.gate.set(&event.scope, false);
        info!(scope = %event.scope, match_id = %event.match_id, "Match finished, gate closed");
        true
    }

    /// Record `key` as handled now; true if it was already handled within the window
    fn recently_handled(&self, key: &str) -> bool {
        let now = self.time_provider.now_millis();
        let window = self.config.dedupe_window_ms;
        let mut recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);

        recent.retain(|_, at| now - *at < window);
        if recent.contains_key(key) {
            return true;
        }
        recent.insert(key.to_string(), now);
        false
    }
}
