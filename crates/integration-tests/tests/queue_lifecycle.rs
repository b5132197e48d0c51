//! Queue Lifecycle Integration Tests
//!
//! Drives the core services together the way the daemon wires them: manager, bus,
//! match lifecycle, gate and seeding.

use std::sync::Arc;

use lineup_core::application::{
    EventBus, LifecycleConfig, ManagerConfig, MatchFinished, MatchLifecycle, MatchStarted,
    PrunePolicy, QueueDefaults, QueueManager, ScopeGate, SeedService, Subscription,
};
use lineup_core::application::queue_manager::check_invariants;
use lineup_core::domain::QueueErrorKind;
use lineup_core::port::id_provider::SequentialIdProvider;
use lineup_core::port::time_provider::ManualTimeProvider;

const SCOPE: &str = "channel-100";

struct System {
    manager: Arc<QueueManager>,
    bus: EventBus,
    gate: Arc<ScopeGate>,
    seeds: SeedService,
    clock: Arc<ManualTimeProvider>,
    _subscriptions: Vec<Subscription>,
}

fn system(policy: PrunePolicy) -> System {
    let clock = Arc::new(ManualTimeProvider::new(1_700_000_000_000));
    let manager = Arc::new(QueueManager::with_config(
        clock.clone(),
        ManagerConfig {
            prune_policy: policy,
            ..ManagerConfig::default()
        },
    ));
    let bus = EventBus::new();
    let gate = Arc::new(ScopeGate::new(false));
    let lifecycle = Arc::new(MatchLifecycle::new(
        manager.clone(),
        gate.clone(),
        clock.clone(),
        LifecycleConfig::default(),
    ));
    let subscriptions = lifecycle.attach(&bus);
    let seeds = SeedService::new(
        manager.clone(),
        Arc::new(SequentialIdProvider::default()),
        QueueDefaults::default(),
    );

    System {
        manager,
        bus,
        gate,
        seeds,
        clock,
        _subscriptions: subscriptions,
    }
}

fn started() -> MatchStarted {
    MatchStarted {
        scope: SCOPE.to_string(),
        match_id: "match-1".to_string(),
    }
}

fn finished() -> MatchFinished {
    MatchFinished {
        scope: SCOPE.to_string(),
        match_id: "match-1".to_string(),
    }
}

/// Seed, draft through a match, finish, and seed again
#[tokio::test]
async fn test_full_match_cycle() {
    let sys = system(PrunePolicy::KeepFirst);

    let report = sys.seeds.seed(SCOPE, Some(12), None).unwrap();
    assert_eq!(report.queues, 3);
    assert!(!sys.gate.is_open(SCOPE));

    assert_eq!(sys.bus.publish(started()), 1);
    assert!(sys.gate.is_open(SCOPE));

    // Five drafted, remaining seven compacted forward
    let queues = sys.manager.queues(SCOPE).unwrap();
    let sizes: Vec<usize> = queues.iter().map(|q| q.len()).collect();
    assert_eq!(sizes, vec![5, 2]);
    assert_eq!(queues[0].players[0].display_name, "mock-06");
    assert_eq!(check_invariants(&queues), Ok(()));

    assert_eq!(sys.bus.publish(finished()), 1);
    assert!(!sys.gate.is_open(SCOPE));

    assert_eq!(sys.seeds.clear(SCOPE, None).unwrap(), 7);
    let queues = sys.manager.queues(SCOPE).unwrap();
    assert_eq!(queues.len(), 1);
    assert!(queues[0].is_empty());

    println!("✅ Full match cycle: seed → draft → finish → clear");
}

/// Repeated announcements of the same match draft only once
#[tokio::test]
async fn test_duplicate_match_announcements() {
    let sys = system(PrunePolicy::KeepFirst);
    sys.seeds.seed(SCOPE, Some(15), None).unwrap();

    sys.bus.publish(started());
    sys.bus.publish(started());
    assert_eq!(sys.manager.stats().players, 10);

    sys.clock.advance(3_000);
    sys.bus.publish(started());
    assert_eq!(sys.manager.stats().players, 5);

    println!("✅ Duplicate match announcements are ignored within the window");
}

/// Under RemoveAll an emptied scope disappears until someone joins again
#[tokio::test]
async fn test_remove_all_policy_drops_empty_scopes() {
    let sys = system(PrunePolicy::RemoveAll);
    sys.seeds.seed(SCOPE, Some(3), Some("bot")).unwrap();

    assert_eq!(sys.seeds.clear(SCOPE, Some("bot")).unwrap(), 3);
    let err = sys.manager.queues(SCOPE).unwrap_err();
    assert!(err.is(QueueErrorKind::NotFound));
    assert_eq!(sys.manager.stats().scopes, 0);

    // Drafting from a freshly ensured, empty queue #1 prunes it again
    sys.bus.publish(started());
    assert!(sys.manager.queues(SCOPE).is_err());
    assert!(sys.gate.is_open(SCOPE));

    sys.manager.join_any(SCOPE, "late", "Late", 5).unwrap();
    assert_eq!(sys.manager.queues(SCOPE).unwrap().len(), 1);

    println!("✅ RemoveAll policy: empty scopes vanish and come back on demand");
}

/// The contract scenarios, end to end through one manager
#[tokio::test]
async fn test_contract_scenarios() {
    let sys = system(PrunePolicy::KeepFirst);
    let manager = &sys.manager;

    let first = manager.ensure_first_queue(SCOPE, "Queue #1", 5).unwrap();
    assert_eq!((first.capacity, first.len()), (5, 0));

    let positions: Vec<usize> = (1..=8)
        .map(|n| {
            manager
                .join_any(SCOPE, &format!("p{}", n), "player", 5)
                .unwrap()
        })
        .collect();
    assert_eq!(positions, vec![1, 1, 1, 1, 1, 2, 2, 2]);

    assert_eq!(manager.leave_any(SCOPE, "p3").unwrap(), 1);
    let queues = manager.queues(SCOPE).unwrap();
    assert_eq!(queues[0].players[4].id, "p6");
    assert_eq!(queues[1].len(), 2);

    let err = manager.join_any(SCOPE, "p8", "again", 5).unwrap_err();
    assert_eq!(err.position(), Some(2));

    manager.reset_at(SCOPE, 1).unwrap();
    let queues = manager.queues(SCOPE).unwrap();
    assert_eq!(queues.len(), 1);
    assert_eq!(queues[0].len(), 2);

    manager.delete_at(SCOPE, 1).unwrap();
    assert!(manager.queues(SCOPE).is_err());

    println!("✅ Contract scenarios hold across a single manager");
}
