//! JSON-RPC API Layer
//!
//! Exposes the queue manager, seeding, match lifecycle and admission gate over
//! JSON-RPC 2.0 with named parameters.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::HandlerDeps;
pub use server::{RpcServer, RpcServerConfig};
