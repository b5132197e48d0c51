//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerView {
    pub id: String,
    pub display_name: String,
    pub joined_at: i64,
}

/// One queue of a scope; `position` is 1-based
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueView {
    pub position: usize,
    pub id: String,
    pub name: String,
    pub capacity: usize,
    pub size: usize,
    pub created_at: i64,
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueListResponse {
    pub scope: String,
    pub open: bool,
    pub queues: Vec<QueueView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnsureRequest {
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinRequest {
    pub scope: String,
    pub player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct JoinResponse {
    pub position: usize,
    /// False when the player was already waiting at `position`
    pub joined: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaveResponse {
    pub position: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopResponse {
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocateResponse {
    pub found: bool,
    pub position: Option<usize>,
    pub slot: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedResponse {
    pub prefix: String,
    pub joined: usize,
    pub queues: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClearMocksResponse {
    pub removed: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub scopes: usize,
    pub queues: usize,
    pub players: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchEventResponse {
    pub delivered: usize,
    pub open: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateResponse {
    pub scope: String,
    pub open: bool,
    pub previous: bool,
}
