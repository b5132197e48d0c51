//! JSON-RPC Server
//!
//! Serves the JSON-RPC 2.0 API over HTTP on a localhost TCP port.

use crate::handler::{HandlerDeps, RpcHandler};
use crate::types::{
    ClearMocksRequest, EnsureRequest, GateRequest, IndexRequest, JoinRequest, LeaveRequest,
    ListRequest, LocateRequest, MatchEventRequest, PopRequest, SeedRequest,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 picks a free port (see the address returned by `start`)
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// Register an async method whose params parse into `$req` and that delegates to `$method`
macro_rules! register {
    ($module:expr, $handler:expr, $name:literal, $req:ty, $method:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($name, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: $req = params.parse()?;
                    handler.$method(req).await
                }
            })
            .map_err(|e| e.to_string())?;
    }};
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, deps: HandlerDeps) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(deps)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the running server's handle and the address it is bound to.
    pub async fn start(self) -> Result<(ServerHandle, SocketAddr), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());
        let handler = &self.handler;

        // Queue operations
        register!(module, handler, "queue.ensure.v1", EnsureRequest, ensure);
        register!(module, handler, "queue.list.v1", ListRequest, list);
        register!(module, handler, "queue.join.v1", JoinRequest, join);
        register!(module, handler, "queue.leave.v1", LeaveRequest, leave);
        register!(module, handler, "queue.reset.v1", IndexRequest, reset);
        register!(module, handler, "queue.delete.v1", IndexRequest, delete);
        register!(module, handler, "queue.pop.v1", PopRequest, pop);
        register!(module, handler, "queue.locate.v1", LocateRequest, locate);

        // Admin APIs
        register!(module, handler, "admin.seed.v1", SeedRequest, seed);
        register!(module, handler, "admin.clear_mocks.v1", ClearMocksRequest, clear_mocks);

        let stats_handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_params, _, _| {
                let handler = stats_handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| e.to_string())?;

        // Match lifecycle and gate
        register!(module, handler, "match.started.v1", MatchEventRequest, match_started);
        register!(module, handler, "match.finished.v1", MatchEventRequest, match_finished);
        register!(module, handler, "gate.set.v1", GateRequest, set_gate);

        info!(addr = %local_addr, "JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok((handle, local_addr))
    }
}
