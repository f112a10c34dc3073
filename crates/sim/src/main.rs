//! Pixelwar simulation demo.
//!
//! Spins up one room with two players 50 units apart and lets auto-spawn
//! and automatic combat run for a few seconds, logging group counts.

use protocol::GameAction;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Pixelwar sim v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = sim::Config::load()?;
    info!("Loaded configuration");
    info!("  Tick interval: {}ms", config.room.tick_interval_ms);
    info!(
        "  Spawn: {} pixels every {}s, max {} groups",
        config.spawn.pixels_per_spawn,
        config.spawn.interval_seconds,
        config.spawn.max_groups_per_player
    );
    info!(
        "  Combat: range {}, damage factor {}",
        config.combat.range, config.combat.pixel_damage_factor
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let on_state: sim::SnapshotCallback = Box::new(move |state| {
        let _ = tx.send(state);
    });

    let mut service = sim::GameService::new(config, on_state);
    service.add_player("A").await;
    service.add_player("B").await;
    // Separate the armies: within engagement range, not on top of each other.
    service
        .handle_action("B", GameAction::Move { x: 50.0, y: 0.0 })
        .await;
    // Starting armies of 30 and 25; auto-spawn reinforces from there.
    service.spawn_group("A", 30).await;
    service.spawn_group("B", 25).await;

    let report = async {
        let mut ticks = 0u64;
        while let Some(state) = rx.recv().await {
            ticks += 1;
            if ticks % 10 != 0 {
                continue;
            }
            let mut lines: Vec<String> = state
                .players
                .values()
                .map(|player| {
                    let pixels: u32 = player
                        .pixel_groups
                        .iter()
                        .map(|group| group.pixel_count)
                        .sum();
                    format!(
                        "{}: {} groups / {} pixels",
                        player.id,
                        player.pixel_groups.len(),
                        pixels
                    )
                })
                .collect();
            lines.sort();
            info!("tick {}: {}", ticks, lines.join(" | "));
        }
    };

    tokio::select! {
        _ = report => {}
        _ = tokio::time::sleep(Duration::from_secs(15)) => {}
    }

    service.dispose().await;
    info!("Room disposed");
    Ok(())
}
