//! RPC Request/Response Types
//!
//! Named-parameter objects for every JSON-RPC method. Indexes and positions are 1-based.

use lineup_core::domain::{Player, Queue};
use serde::{Deserialize, Serialize};

/// Snapshot of one queue as sent over the wire
#[derive(Debug, Clone, Serialize)]
pub struct QueueView {
    pub position: usize,
    pub id: String,
    pub name: String,
    pub capacity: usize,
    pub size: usize,
    pub created_at: i64,
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: String,
    pub display_name: String,
    pub joined_at: i64,
}

impl From<Player> for PlayerView {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            display_name: player.display_name,
            joined_at: player.joined_at,
        }
    }
}

impl QueueView {
    pub fn from_queue(position: usize, queue: Queue) -> Self {
        Self {
            position,
            size: queue.len(),
            id: queue.id,
            name: queue.name,
            capacity: queue.capacity,
            created_at: queue.created_at,
            players: queue.players.into_iter().map(PlayerView::from).collect(),
        }
    }

    pub fn list(queues: Vec<Queue>) -> Vec<Self> {
        queues
            .into_iter()
            .enumerate()
            .map(|(idx, queue)| Self::from_queue(idx + 1, queue))
            .collect()
    }
}

/// queue.ensure.v1 - Create queue #1 if the scope has none
#[derive(Debug, Deserialize)]
pub struct EnsureRequest {
    pub scope: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Signed so that non-positive values reach validation instead of failing to parse
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// queue.list.v1 / queue.reset.v1 / queue.delete.v1 response
#[derive(Debug, Clone, Serialize)]
pub struct QueueListResponse {
    pub scope: String,
    pub open: bool,
    pub queues: Vec<QueueView>,
}

/// queue.list.v1 - Snapshot of every queue in a scope
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    pub scope: String,
}

/// queue.join.v1 - Admit a player
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub scope: String,
    pub player_id: String,
    /// Defaults to the player id
    #[serde(default)]
    pub display_name: Option<String>,
    /// Non-positive values fall back to the default capacity
    #[serde(default)]
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinResponse {
    pub position: usize,
    /// False when the player was already waiting; `position` is then their existing one
    pub joined: bool,
}

/// queue.leave.v1 - Remove a player
#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub scope: String,
    pub player_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveResponse {
    pub position: usize,
}

/// queue.reset.v1 / queue.delete.v1 - Target one queue by position
#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub scope: String,
    pub index: usize,
}

/// queue.pop.v1 - Draft players from the head of queue #1
#[derive(Debug, Deserialize)]
pub struct PopRequest {
    pub scope: String,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopResponse {
    pub players: Vec<PlayerView>,
}

/// queue.locate.v1 - Where is a player waiting
#[derive(Debug, Deserialize)]
pub struct LocateRequest {
    pub scope: String,
    pub player_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocateResponse {
    pub found: bool,
    pub position: Option<usize>,
    pub slot: Option<usize>,
}

/// admin.seed.v1 - Add synthetic players
#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    pub scope: String,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedResponse {
    pub prefix: String,
    pub joined: usize,
    pub queues: usize,
}

/// admin.clear_mocks.v1 - Remove synthetic players
#[derive(Debug, Deserialize)]
pub struct ClearMocksRequest {
    pub scope: String,
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearMocksResponse {
    pub removed: usize,
}

/// admin.stats.v1 - Registry counters (takes no parameters)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub scopes: usize,
    pub queues: usize,
    pub players: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// match.started.v1 / match.finished.v1 - Publish a match event
#[derive(Debug, Deserialize)]
pub struct MatchEventRequest {
    pub scope: String,
    #[serde(default)]
    pub match_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchEventResponse {
    /// Subscribers that handled the event
    pub delivered: usize,
    pub open: bool,
}

/// gate.set.v1 - Open or close joins for a scope
#[derive(Debug, Deserialize)]
pub struct GateRequest {
    pub scope: String,
    pub open: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GateResponse {
    pub scope: String,
    pub open: bool,
    pub previous: bool,
}
