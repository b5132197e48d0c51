//! Lineup Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    ClearMocksResponse, EnsureRequest, GateResponse, JoinRequest, JoinResponse, LeaveResponse,
    LocateResponse, MatchEventResponse, PlayerView, PopResponse, QueueListResponse, QueueView,
    SeedResponse, StatsResponse,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

/// Lineup daemon client
///
/// Every call sends named parameters, matching what the daemon parses.
///
/// # Example
///
/// ```no_run
/// use lineup_sdk::LineupClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = LineupClient::connect("http://127.0.0.1:9630").await?;
/// let joined = client.join("chan-1", "p1", Some("Alice")).await?;
/// println!("waiting in queue #{}", joined.position);
/// # Ok(())
/// # }
/// ```
pub struct LineupClient {
    client: HttpClient,
}

impl LineupClient {
    /// Connect to the Lineup daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9630`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create queue #1 if the scope has none; `None` uses the daemon defaults
    pub async fn ensure(
        &self,
        scope: &str,
        name: Option<&str>,
        capacity: Option<usize>,
    ) -> Result<QueueView> {
        let request = EnsureRequest {
            scope: scope.to_string(),
            name: name.map(str::to_string),
            capacity,
        };
        self.call("queue.ensure.v1", &request).await
    }

    pub async fn list(&self, scope: &str) -> Result<QueueListResponse> {
        self.call("queue.list.v1", &json!({ "scope": scope })).await
    }

    /// Join with the daemon's default capacity
    ///
    /// A player already waiting comes back with `joined: false` and their current position.
    pub async fn join(
        &self,
        scope: &str,
        player_id: &str,
        display_name: Option<&str>,
    ) -> Result<JoinResponse> {
        self.join_with(JoinRequest {
            scope: scope.to_string(),
            player_id: player_id.to_string(),
            display_name: display_name.map(str::to_string),
            capacity: None,
        })
        .await
    }

    pub async fn join_with(&self, request: JoinRequest) -> Result<JoinResponse> {
        self.call("queue.join.v1", &request).await
    }

    /// Returns the 1-based queue position the player left
    pub async fn leave(&self, scope: &str, player_id: &str) -> Result<usize> {
        let response: LeaveResponse = self
            .call(
                "queue.leave.v1",
                &json!({ "scope": scope, "player_id": player_id }),
            )
            .await?;
        Ok(response.position)
    }

    pub async fn reset(&self, scope: &str, index: usize) -> Result<QueueListResponse> {
        self.call("queue.reset.v1", &json!({ "scope": scope, "index": index }))
            .await
    }

    pub async fn delete(&self, scope: &str, index: usize) -> Result<QueueListResponse> {
        self.call("queue.delete.v1", &json!({ "scope": scope, "index": index }))
            .await
    }

    pub async fn pop(&self, scope: &str, count: Option<usize>) -> Result<Vec<PlayerView>> {
        let response: PopResponse = self
            .call("queue.pop.v1", &json!({ "scope": scope, "count": count }))
            .await?;
        Ok(response.players)
    }

    /// (queue position, slot), both 1-based, when the player is waiting
    pub async fn locate(&self, scope: &str, player_id: &str) -> Result<Option<(usize, usize)>> {
        let response: LocateResponse = self
            .call(
                "queue.locate.v1",
                &json!({ "scope": scope, "player_id": player_id }),
            )
            .await?;
        Ok(response.position.zip(response.slot))
    }

    pub async fn seed(
        &self,
        scope: &str,
        count: Option<usize>,
        prefix: Option<&str>,
    ) -> Result<SeedResponse> {
        self.call(
            "admin.seed.v1",
            &json!({ "scope": scope, "count": count, "prefix": prefix }),
        )
        .await
    }

    /// Returns how many synthetic players were removed
    pub async fn clear_mocks(&self, scope: &str, prefix: Option<&str>) -> Result<usize> {
        let response: ClearMocksResponse = self
            .call(
                "admin.clear_mocks.v1",
                &json!({ "scope": scope, "prefix": prefix }),
            )
            .await?;
        Ok(response.removed)
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        let response: StatsResponse = self.client.request("admin.stats.v1", rpc_params![]).await?;
        Ok(response)
    }

    pub async fn match_started(
        &self,
        scope: &str,
        match_id: Option<&str>,
    ) -> Result<MatchEventResponse> {
        self.call(
            "match.started.v1",
            &json!({ "scope": scope, "match_id": match_id }),
        )
        .await
    }

    pub async fn match_finished(
        &self,
        scope: &str,
        match_id: Option<&str>,
    ) -> Result<MatchEventResponse> {
        self.call(
            "match.finished.v1",
            &json!({ "scope": scope, "match_id": match_id }),
        )
        .await
    }

    pub async fn set_gate(&self, scope: &str, open: bool) -> Result<GateResponse> {
        self.call("gate.set.v1", &json!({ "scope": scope, "open": open }))
            .await
    }

    async fn call<P, R>(&self, method: &str, request: &P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let params = named_params(request)?;
        let response: R = self.client.request(method, params).await?;
        Ok(response)
    }
}

/// Turn a serializable object into JSON-RPC named parameters
fn named_params<P: Serialize>(request: &P) -> Result<ObjectParams> {
    let mut params = ObjectParams::new();
    match serde_json::to_value(request)? {
        serde_json::Value::Object(fields) => {
            for (name, value) in fields {
                params.insert(&name, value)?;
            }
            Ok(params)
        }
        other => Err(SdkError::Other(format!(
            "request must serialize to an object, got {}",
            other
        ))),
    }
}
