//! Simple SDK Example
//!
//! Demonstrates basic usage of the Lineup SDK.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package lineup-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple
//!    ```

use lineup_sdk::LineupClient;

const SCOPE: &str = "example-channel";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Lineup SDK - Simple Example");
    println!("===========================\n");

    // 1. Connect to daemon
    println!("1. Connecting to daemon...");
    let client = LineupClient::connect("http://127.0.0.1:9630").await?;
    println!("   ✓ Connected\n");

    // 2. Make sure the scope has its first queue
    println!("2. Ensuring queue #1...");
    let first = client.ensure(SCOPE, None, Some(5)).await?;
    println!("   ✓ {} (capacity {})\n", first.name, first.capacity);

    // 3. Join seven players; the last two overflow into queue #2
    println!("3. Joining players...");
    for n in 1..=7 {
        let id = format!("player-{}", n);
        let joined = client.join(SCOPE, &id, None).await?;
        println!("   - {} -> queue #{}", id, joined.position);
    }
    println!();

    // 4. One leaves; the head of queue #2 is promoted
    println!("4. player-3 leaves...");
    client.leave(SCOPE, "player-3").await?;
    for queue in client.list(SCOPE).await?.queues {
        let names: Vec<&str> = queue.players.iter().map(|p| p.id.as_str()).collect();
        println!("   {} [{}/{}]: {}", queue.name, queue.size, queue.capacity, names.join(", "));
    }
    println!();

    // 5. A match starts and drafts queue #1
    println!("5. Starting a match...");
    let started = client.match_started(SCOPE, None).await?;
    println!("   ✓ Delivered to {} handlers, joins open: {}", started.delivered, started.open);

    let stats = client.stats().await?;
    println!(
        "   Daemon now tracks {} players in {} queues",
        stats.players, stats.queues
    );

    println!("\n✓ Example completed successfully!");

    Ok(())
}
