//! RPC Method Handlers
//!
//! Thin adapters: validate parameters, call the core services, shape the response.

use crate::error::to_rpc_error;
use crate::types::{
    ClearMocksRequest, ClearMocksResponse, EnsureRequest, GateRequest, GateResponse,
    IndexRequest, JoinRequest, JoinResponse, LeaveRequest, LeaveResponse, ListRequest,
    LocateRequest, LocateResponse, MatchEventRequest, MatchEventResponse, PlayerView,
    PopRequest, PopResponse, QueueListResponse, QueueView, SeedRequest, SeedResponse,
    StatsResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use lineup_core::application::{
    EventBus, MatchFinished, MatchStarted, QueueDefaults, QueueManager, ScopeGate, SeedService,
};
use lineup_core::domain::{QueueError, QueueErrorKind};
use lineup_core::error::AppError;
use lineup_core::port::IdProvider;
use std::sync::Arc;
use tracing::info;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// Services the handler is wired to
pub struct HandlerDeps {
    pub manager: Arc<QueueManager>,
    pub bus: EventBus,
    pub gate: Arc<ScopeGate>,
    pub seeds: Arc<SeedService>,
    pub id_provider: Arc<dyn IdProvider>,
    pub defaults: QueueDefaults,
    /// Players drafted by queue.pop.v1 when no count is given
    pub pop_count: usize,
}

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    deps: HandlerDeps,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(deps: HandlerDeps) -> Self {
        Self {
            deps,
            start_time: std::time::Instant::now(),
        }
    }

    /// queue.ensure.v1
    pub async fn ensure(&self, params: EnsureRequest) -> RpcResult<QueueView> {
        require("scope", &params.scope)?;
        let name = params
            .name
            .unwrap_or_else(|| self.deps.defaults.first_queue_name.clone());
        let capacity = match params.capacity {
            None => self.deps.defaults.capacity,
            Some(raw) => usize::try_from(raw).map_err(|_| {
                to_rpc_error(AppError::Validation(format!(
                    "Invalid capacity: {} (must be positive)",
                    raw
                )))
            })?,
        };

        let queue = self
            .deps
            .manager
            .ensure_first_queue(&params.scope, &name, capacity)
            .map_err(queue_error)?;
        Ok(QueueView::from_queue(1, queue))
    }

    /// queue.list.v1
    pub async fn list(&self, params: ListRequest) -> RpcResult<QueueListResponse> {
        require("scope", &params.scope)?;
        let queues = self
            .deps
            .manager
            .queues(&params.scope)
            .map_err(queue_error)?;
        Ok(self.list_response(params.scope, queues))
    }

    /// queue.join.v1
    ///
    /// A player who is already waiting is not an error: the response carries their
    /// existing position with `joined: false`.
    pub async fn join(&self, params: JoinRequest) -> RpcResult<JoinResponse> {
        require("scope", &params.scope)?;
        require("player_id", &params.player_id)?;
        if !self.deps.gate.is_open(&params.scope) {
            return Err(to_rpc_error(AppError::InvalidState(format!(
                "Queue is closed for scope {}",
                params.scope
            ))));
        }

        let capacity = params
            .capacity
            .filter(|raw| *raw > 0)
            .and_then(|raw| usize::try_from(raw).ok())
            .unwrap_or(self.deps.defaults.capacity);
        self.deps
            .manager
            .ensure_first_queue(&params.scope, &self.deps.defaults.first_queue_name, capacity)
            .map_err(queue_error)?;

        let display_name = params
            .display_name
            .unwrap_or_else(|| params.player_id.clone());
        match self
            .deps
            .manager
            .join_any(&params.scope, &params.player_id, &display_name, capacity)
        {
            Ok(position) => Ok(JoinResponse {
                position,
                joined: true,
            }),
            Err(e) if e.is(QueueErrorKind::AlreadyIn) => Ok(JoinResponse {
                position: e.position().unwrap_or_default(),
                joined: false,
            }),
            Err(e) => Err(queue_error(e)),
        }
    }

    /// queue.leave.v1
    pub async fn leave(&self, params: LeaveRequest) -> RpcResult<LeaveResponse> {
        require("scope", &params.scope)?;
        let position = self
            .deps
            .manager
            .leave_any(&params.scope, &params.player_id)
            .map_err(queue_error)?;
        Ok(LeaveResponse { position })
    }

    /// queue.reset.v1
    pub async fn reset(&self, params: IndexRequest) -> RpcResult<QueueListResponse> {
        require("scope", &params.scope)?;
        self.deps
            .manager
            .reset_at(&params.scope, params.index)
            .map_err(queue_error)?;
        Ok(self.current(params.scope))
    }

    /// queue.delete.v1
    pub async fn delete(&self, params: IndexRequest) -> RpcResult<QueueListResponse> {
        require("scope", &params.scope)?;
        self.deps
            .manager
            .delete_at(&params.scope, params.index)
            .map_err(queue_error)?;
        Ok(self.current(params.scope))
    }

    /// queue.pop.v1
    pub async fn pop(&self, params: PopRequest) -> RpcResult<PopResponse> {
        require("scope", &params.scope)?;
        let count = params.count.unwrap_or(self.deps.pop_count);
        let players = self
            .deps
            .manager
            .pop_from_first(&params.scope, count)
            .map_err(queue_error)?;
        Ok(PopResponse {
            players: players.into_iter().map(PlayerView::from).collect(),
        })
    }

    /// queue.locate.v1
    pub async fn locate(&self, params: LocateRequest) -> RpcResult<LocateResponse> {
        require("scope", &params.scope)?;
        let placement = self.deps.manager.locate(&params.scope, &params.player_id);
        Ok(LocateResponse {
            found: placement.is_some(),
            position: placement.map(|p| p.position),
            slot: placement.map(|p| p.slot),
        })
    }

    /// admin.seed.v1
    pub async fn seed(&self, params: SeedRequest) -> RpcResult<SeedResponse> {
        let report = self
            .deps
            .seeds
            .seed(&params.scope, params.count, params.prefix.as_deref())
            .map_err(to_rpc_error)?;
        Ok(SeedResponse {
            prefix: report.prefix,
            joined: report.joined,
            queues: report.queues,
        })
    }

    /// admin.clear_mocks.v1
    pub async fn clear_mocks(&self, params: ClearMocksRequest) -> RpcResult<ClearMocksResponse> {
        let removed = self
            .deps
            .seeds
            .clear(&params.scope, params.prefix.as_deref())
            .map_err(to_rpc_error)?;
        Ok(ClearMocksResponse { removed })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> RpcResult<StatsResponse> {
        let stats = self.deps.manager.stats();
        Ok(StatsResponse {
            scopes: stats.scopes,
            queues: stats.queues,
            players: stats.players,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            version: lineup_core::VERSION.to_string(),
        })
    }

    /// match.started.v1
    pub async fn match_started(&self, params: MatchEventRequest) -> RpcResult<MatchEventResponse> {
        require("scope", &params.scope)?;
        let event = MatchStarted {
            match_id: self.match_id(params.match_id),
            scope: params.scope,
        };
        info!(scope = %event.scope, match_id = %event.match_id, "Publishing match start");

        let open_scope = event.scope.clone();
        let delivered = self.deps.bus.publish(event);
        Ok(MatchEventResponse {
            delivered,
            open: self.deps.gate.is_open(&open_scope),
        })
    }

    /// match.finished.v1
    pub async fn match_finished(
        &self,
        params: MatchEventRequest,
    ) -> RpcResult<MatchEventResponse> {
        require("scope", &params.scope)?;
        let event = MatchFinished {
            match_id: self.match_id(params.match_id),
            scope: params.scope,
        };
        info!(scope = %event.scope, match_id = %event.match_id, "Publishing match finish");

        let open_scope = event.scope.clone();
        let delivered = self.deps.bus.publish(event);
        Ok(MatchEventResponse {
            delivered,
            open: self.deps.gate.is_open(&open_scope),
        })
    }

    /// gate.set.v1
    pub async fn set_gate(&self, params: GateRequest) -> RpcResult<GateResponse> {
        require("scope", &params.scope)?;
        let previous = self.deps.gate.set(&params.scope, params.open);
        Ok(GateResponse {
            scope: params.scope,
            open: params.open,
            previous,
        })
    }

    fn match_id(&self, requested: Option<String>) -> String {
        requested
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.deps.id_provider.generate_id())
    }

    fn list_response(
        &self,
        scope: String,
        queues: Vec<lineup_core::domain::Queue>,
    ) -> QueueListResponse {
        QueueListResponse {
            open: self.deps.gate.is_open(&scope),
            scope,
            queues: QueueView::list(queues),
        }
    }

    /// Snapshot after a mutation; a scope left without queues lists as empty
    fn current(&self, scope: String) -> QueueListResponse {
        let queues = self.deps.manager.queues(&scope).unwrap_or_default();
        self.list_response(scope, queues)
    }
}

fn require(field: &str, value: &str) -> RpcResult<()> {
    if value.trim().is_empty() {
        return Err(to_rpc_error(AppError::Validation(format!(
            "{} must not be empty",
            field
        ))));
    }
    Ok(())
}

fn queue_error(err: QueueError) -> ErrorObjectOwned {
    to_rpc_error(err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use lineup_core::application::{LifecycleConfig, MatchLifecycle};
    use lineup_core::port::id_provider::SequentialIdProvider;
    use lineup_core::port::time_provider::ManualTimeProvider;

    struct Fixture {
        handler: RpcHandler,
        gate: Arc<ScopeGate>,
        // Keeps the lifecycle subscribed for the test's duration
        _subscriptions: Vec<lineup_core::application::Subscription>,
    }

    fn fixture(gate_default: bool) -> Fixture {
        let clock = Arc::new(ManualTimeProvider::new(1_000));
        let ids = Arc::new(SequentialIdProvider::default());
        let manager = Arc::new(QueueManager::new(clock.clone()));
        let gate = Arc::new(ScopeGate::new(gate_default));
        let bus = EventBus::new();
        let defaults = QueueDefaults::default();

        let lifecycle = Arc::new(MatchLifecycle::new(
            manager.clone(),
            gate.clone(),
            clock,
            LifecycleConfig::default(),
        ));
        let subscriptions = lifecycle.attach(&bus);

        let seeds = Arc::new(SeedService::new(
            manager.clone(),
            ids.clone(),
            defaults.clone(),
        ));
        let handler = RpcHandler::new(HandlerDeps {
            manager,
            bus,
            gate: gate.clone(),
            seeds,
            id_provider: ids,
            defaults,
            pop_count: 5,
        });
        Fixture {
            handler,
            gate,
            _subscriptions: subscriptions,
        }
    }

    fn join(scope: &str, player_id: &str) -> JoinRequest {
        JoinRequest {
            scope: scope.to_string(),
            player_id: player_id.to_string(),
            display_name: None,
            capacity: None,
        }
    }

    #[tokio::test]
    async fn test_join_creates_first_queue_and_reports_duplicates() {
        let f = fixture(true);

        let first = f.handler.join(join("chan", "p1")).await.unwrap();
        assert_eq!(first.position, 1);
        assert!(first.joined);

        let again = f.handler.join(join("chan", "p1")).await.unwrap();
        assert_eq!(again.position, 1);
        assert!(!again.joined);

        let list = f
            .handler
            .list(ListRequest {
                scope: "chan".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(list.queues.len(), 1);
        assert_eq!(list.queues[0].name, "Queue #1");
        assert_eq!(list.queues[0].players[0].display_name, "p1");
    }

    #[tokio::test]
    async fn test_join_non_positive_capacity_uses_default() {
        let f = fixture(true);

        for (player, capacity) in [("p1", 0), ("p2", -3)] {
            let joined = f
                .handler
                .join(JoinRequest {
                    capacity: Some(capacity),
                    ..join("chan", player)
                })
                .await
                .unwrap();
            assert!(joined.joined);
            assert_eq!(joined.position, 1);
        }

        let list = f
            .handler
            .list(ListRequest {
                scope: "chan".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(list.queues.len(), 1);
        assert_eq!(list.queues[0].capacity, 5);
        assert_eq!(list.queues[0].size, 2);
    }

    #[tokio::test]
    async fn test_ensure_negative_capacity_is_invalid() {
        let f = fixture(true);

        let err = f
            .handler
            .ensure(EnsureRequest {
                scope: "chan".to_string(),
                name: None,
                capacity: Some(-1),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert!(err.message().contains("Invalid capacity: -1"));

        let err = f
            .handler
            .list(ListRequest {
                scope: "chan".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_join_refused_when_gate_closed() {
        let f = fixture(false);

        let err = f.handler.join(join("chan", "p1")).await.unwrap_err();
        assert_eq!(err.code(), code::CONFLICT);

        f.gate.set("chan", true);
        assert!(f.handler.join(join("chan", "p1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_validation_and_not_found_codes() {
        let f = fixture(true);

        let err = f.handler.join(join(" ", "p1")).await.unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);

        let err = f
            .handler
            .list(ListRequest {
                scope: "ghost".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);

        let err = f
            .handler
            .ensure(EnsureRequest {
                scope: "chan".to_string(),
                name: None,
                capacity: Some(0),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);

        let err = f
            .handler
            .leave(LeaveRequest {
                scope: "ghost".to_string(),
                player_id: "p1".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_only_queue_lists_empty() {
        let f = fixture(true);
        f.handler.join(join("chan", "p1")).await.unwrap();

        let after = f
            .handler
            .delete(IndexRequest {
                scope: "chan".to_string(),
                index: 1,
            })
            .await
            .unwrap();
        assert!(after.queues.is_empty());
    }

    #[tokio::test]
    async fn test_seed_then_locate_and_stats() {
        let f = fixture(true);
        let seeded = f
            .handler
            .seed(SeedRequest {
                scope: "chan".to_string(),
                count: Some(7),
                prefix: None,
            })
            .await
            .unwrap();
        assert_eq!(seeded.joined, 7);
        assert_eq!(seeded.queues, 2);

        let located = f
            .handler
            .locate(LocateRequest {
                scope: "chan".to_string(),
                player_id: "mock:7".to_string(),
            })
            .await
            .unwrap();
        assert!(located.found);
        assert_eq!(located.position, Some(2));
        assert_eq!(located.slot, Some(2));

        let stats = f.handler.stats().await.unwrap();
        assert_eq!((stats.scopes, stats.queues, stats.players), (1, 2, 7));

        let cleared = f
            .handler
            .clear_mocks(ClearMocksRequest {
                scope: "chan".to_string(),
                prefix: None,
            })
            .await
            .unwrap();
        assert_eq!(cleared.removed, 7);
    }

    #[tokio::test]
    async fn test_match_events_drive_gate_and_draft() {
        let f = fixture(false);
        f.gate.set("chan", true);
        for n in 1..=6 {
            f.handler.join(join("chan", &format!("p{}", n))).await.unwrap();
        }
        f.gate.set("chan", false);

        let started = f
            .handler
            .match_started(MatchEventRequest {
                scope: "chan".to_string(),
                match_id: None,
            })
            .await
            .unwrap();
        assert_eq!(started.delivered, 1);
        assert!(started.open);

        let list = f
            .handler
            .list(ListRequest {
                scope: "chan".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(list.queues[0].size, 1);
        assert_eq!(list.queues[0].players[0].id, "p6");

        let finished = f
            .handler
            .match_finished(MatchEventRequest {
                scope: "chan".to_string(),
                match_id: Some("m-9".to_string()),
            })
            .await
            .unwrap();
        assert!(!finished.open);
    }

    #[tokio::test]
    async fn test_pop_uses_configured_count() {
        let f = fixture(true);
        for n in 1..=7 {
            f.handler.join(join("chan", &format!("p{}", n))).await.unwrap();
        }

        let popped = f
            .handler
            .pop(PopRequest {
                scope: "chan".to_string(),
                count: None,
            })
            .await
            .unwrap();
        assert_eq!(popped.players.len(), 5);

        let gate = f
            .handler
            .set_gate(GateRequest {
                scope: "chan".to_string(),
                open: false,
            })
            .await
            .unwrap();
        assert!(gate.previous);
        assert!(!gate.open);
    }
}
