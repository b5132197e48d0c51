//! Lineup CLI - Command-line interface for the Lineup daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";
const DEFAULT_SCOPE: &str = "default";

#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Lineup queue manager CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "LINEUP_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Scope (e.g. a channel id) the command applies to
    #[arg(short, long, global = true, env = "LINEUP_SCOPE", default_value = DEFAULT_SCOPE)]
    scope: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create queue #1 if the scope has none
    Ensure {
        /// Queue name (daemon default when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Capacity (daemon default when omitted)
        #[arg(short, long)]
        capacity: Option<usize>,
    },

    /// Show every queue in the scope
    List,

    /// Add a player to the first queue with room
    Join {
        player_id: String,

        /// Display name (defaults to the player id)
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        capacity: Option<usize>,
    },

    /// Remove a player from whichever queue holds them
    Leave { player_id: String },

    /// Clear the players of queue N (1-based)
    Reset { index: usize },

    /// Remove queue N (1-based)
    Delete { index: usize },

    /// Draft players from the head of queue #1
    Pop {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show where a player is waiting
    Where { player_id: String },

    /// Add synthetic players
    Seed {
        #[arg(short = 'n', long)]
        count: Option<usize>,

        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Remove synthetic players
    ClearMocks {
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Show daemon status
    Status,

    /// Announce a match start (drafts queue #1 and opens joins)
    MatchStart {
        #[arg(long)]
        match_id: Option<String>,
    },

    /// Announce a match finish (closes joins)
    MatchFinish {
        #[arg(long)]
        match_id: Option<String>,
    },

    /// Accept joins for the scope
    Open,

    /// Refuse joins for the scope
    Close,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct PlayerResult {
    display_name: String,
}

#[derive(Deserialize)]
struct QueueResult {
    position: usize,
    name: String,
    capacity: usize,
    size: usize,
    players: Vec<PlayerResult>,
}

#[derive(Deserialize)]
struct ListResult {
    scope: String,
    open: bool,
    queues: Vec<QueueResult>,
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "#")]
    position: usize,
    name: String,
    filled: String,
    players: String,
}

impl From<&QueueResult> for QueueRow {
    fn from(queue: &QueueResult) -> Self {
        Self {
            position: queue.position,
            name: queue.name.clone(),
            filled: format!("{}/{}", queue.size, queue.capacity),
            players: queue
                .players
                .iter()
                .map(|p| p.display_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Deserialize, Tabled)]
struct DraftedRow {
    id: String,
    display_name: String,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn print_queues(list: &ListResult) {
    let state = if list.open {
        "OPEN".green()
    } else {
        "CLOSED".red()
    };
    println!("{} {} [{}]", "Scope".cyan().bold(), list.scope, state);

    if list.queues.is_empty() {
        println!("{}", "No queues".yellow());
        return;
    }

    let rows: Vec<QueueRow> = list.queues.iter().map(QueueRow::from).collect();
    println!("{}", Table::new(rows));
}

async fn set_gate(url: &str, scope: &str, open: bool) -> Result<()> {
    let params = json!({ "scope": scope, "open": open });
    call_rpc(url, "gate.set.v1", params).await?;

    let label = if open { "open".green() } else { "closed".red() };
    println!("  {} joins are now {}", scope.bold(), label);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let url = cli.rpc_url.as_str();
    let scope = cli.scope.as_str();

    match cli.command {
        Commands::Ensure { name, capacity } => {
            let params = json!({ "scope": scope, "name": name, "capacity": capacity });
            let queue = call_rpc(url, "queue.ensure.v1", params).await?;
            println!(
                "{}",
                format!("✓ {} ready (capacity {})", queue["name"], queue["capacity"])
                    .green()
                    .bold()
            );
        }

        Commands::List => {
            let result = call_rpc(url, "queue.list.v1", json!({ "scope": scope })).await?;
            let list: ListResult = serde_json::from_value(result)?;
            print_queues(&list);
        }

        Commands::Join {
            player_id,
            name,
            capacity,
        } => {
            let params = json!({
                "scope": scope,
                "player_id": player_id,
                "display_name": name,
                "capacity": capacity,
            });
            let result = call_rpc(url, "queue.join.v1", params).await?;

            if result["joined"].as_bool().unwrap_or(false) {
                println!(
                    "{}",
                    format!("✓ {} joined queue #{}", player_id, result["position"])
                        .green()
                        .bold()
                );
            } else {
                println!(
                    "{}",
                    format!("○ {} is already in queue #{}", player_id, result["position"])
                        .yellow()
                );
            }
        }

        Commands::Leave { player_id } => {
            let params = json!({ "scope": scope, "player_id": player_id });
            let result = call_rpc(url, "queue.leave.v1", params).await?;
            println!(
                "{}",
                format!("✓ {} left queue #{}", player_id, result["position"])
                    .green()
                    .bold()
            );
        }

        Commands::Reset { index } => {
            let params = json!({ "scope": scope, "index": index });
            let result = call_rpc(url, "queue.reset.v1", params).await?;
            println!("{}", format!("✓ Queue #{} reset", index).green().bold());
            print_queues(&serde_json::from_value(result)?);
        }

        Commands::Delete { index } => {
            let params = json!({ "scope": scope, "index": index });
            let result = call_rpc(url, "queue.delete.v1", params).await?;
            println!("{}", format!("✓ Queue #{} deleted", index).green().bold());
            print_queues(&serde_json::from_value(result)?);
        }

        Commands::Pop { count } => {
            let params = json!({ "scope": scope, "count": count });
            let result = call_rpc(url, "queue.pop.v1", params).await?;
            let drafted: Vec<DraftedRow> = serde_json::from_value(result["players"].clone())?;

            if drafted.is_empty() {
                println!("{}", "Queue #1 is empty".yellow());
            } else {
                println!(
                    "{}",
                    format!("✓ Drafted {} players", drafted.len()).green().bold()
                );
                println!("{}", Table::new(drafted));
            }
        }

        Commands::Where { player_id } => {
            let params = json!({ "scope": scope, "player_id": player_id });
            let result = call_rpc(url, "queue.locate.v1", params).await?;

            if result["found"].as_bool().unwrap_or(false) {
                println!(
                    "  {} queue #{}, slot {}",
                    player_id.bold(),
                    result["position"],
                    result["slot"]
                );
            } else {
                println!("{}", format!("{} is not waiting in {}", player_id, scope).yellow());
            }
        }

        Commands::Seed { count, prefix } => {
            let params = json!({ "scope": scope, "count": count, "prefix": prefix });
            let result = call_rpc(url, "admin.seed.v1", params).await?;
            println!(
                "{}",
                format!(
                    "✓ Added {} {:?} players ({} queues)",
                    result["joined"],
                    result["prefix"].as_str().unwrap_or_default(),
                    result["queues"]
                )
                .green()
                .bold()
            );
        }

        Commands::ClearMocks { prefix } => {
            let params = json!({ "scope": scope, "prefix": prefix });
            let result = call_rpc(url, "admin.clear_mocks.v1", params).await?;
            println!(
                "{}",
                format!("✓ Removed {} synthetic players", result["removed"])
                    .green()
                    .bold()
            );
        }

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {}", "Version:".bold(), stats["version"]);
                    println!();
                    println!("  {} {}", "Scopes:".bold(), stats["scopes"]);
                    println!("  {} {}", "Queues:".bold(), stats["queues"]);
                    println!("  {} {}", "Players:".bold(), stats["players"]);
                    println!();
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::MatchStart { match_id } => {
            let params = json!({ "scope": scope, "match_id": match_id });
            let result = call_rpc(url, "match.started.v1", params).await?;
            println!(
                "{}",
                format!("✓ Match start delivered to {} handlers", result["delivered"])
                    .green()
                    .bold()
            );
        }

        Commands::MatchFinish { match_id } => {
            let params = json!({ "scope": scope, "match_id": match_id });
            let result = call_rpc(url, "match.finished.v1", params).await?;
            println!(
                "{}",
                format!("✓ Match finish delivered to {} handlers", result["delivered"])
                    .green()
                    .bold()
            );
        }

        Commands::Open => set_gate(url, scope, true).await?,

        Commands::Close => set_gate(url, scope, false).await?,
    }

    Ok(())
}
