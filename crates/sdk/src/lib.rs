//! Lineup SDK - Rust Client Library
//!
//! Typed async client for the Lineup daemon's JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use lineup_sdk::LineupClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LineupClient::connect("http://127.0.0.1:9630").await?;
//!
//!     client.join("chan-1", "p1", Some("Alice")).await?;
//!     for queue in client.list("chan-1").await?.queues {
//!         println!("{}: {}/{}", queue.name, queue.size, queue.capacity);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::LineupClient;
pub use error::{code, Result, SdkError};
pub use types::{
    ClearMocksResponse, EnsureRequest, GateResponse, JoinRequest, JoinResponse, LeaveResponse,
    LocateResponse, MatchEventResponse, PlayerView, PopResponse, QueueListResponse, QueueView,
    SeedResponse, StatsResponse,
};
