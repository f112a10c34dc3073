//! Room configuration.

use protocol::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub room: RoomConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub combat: CombatConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl Config {
    /// Load configuration from `config.toml` or use defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Path::new("config.toml");
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No config.toml found, creating default config");
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            room: RoomConfig::default(),
            spawn: SpawnConfig::default(),
            player: PlayerConfig::default(),
            combat: CombatConfig::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

/// Tick scheduling settings for one room.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomConfig {
    /// Tick interval in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
        }
    }
}

fn default_tick_interval() -> u64 {
    50
}

/// Periodic pixel-group spawn settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpawnConfig {
    /// Seconds between automatic spawns, per player.
    #[serde(default = "default_spawn_interval")]
    pub interval_seconds: f32,
    /// Pixels in each automatically spawned group.
    #[serde(default = "default_pixels_per_spawn")]
    pub pixels_per_spawn: u32,
    /// Maximum groups a player may own at once.
    #[serde(default = "default_max_groups")]
    pub max_groups_per_player: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_spawn_interval(),
            pixels_per_spawn: default_pixels_per_spawn(),
            max_groups_per_player: default_max_groups(),
        }
    }
}

fn default_spawn_interval() -> f32 {
    3.0
}
fn default_pixels_per_spawn() -> u32 {
    15
}
fn default_max_groups() -> usize {
    10
}

/// Player settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Movement speed in units per second.
    #[serde(default = "default_player_speed")]
    pub speed: f32,
    /// Palette cycled as players join.
    #[serde(default = "default_colors")]
    pub colors: Vec<Color>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: default_player_speed(),
            colors: default_colors(),
        }
    }
}

fn default_player_speed() -> f32 {
    100.0
}

fn default_colors() -> Vec<Color> {
    vec![
        Color::new(0xff, 0x4d, 0x4d), // red
        Color::new(0x4d, 0xa6, 0xff), // blue
        Color::new(0x8c, 0xff, 0x66), // green
        Color::new(0xff, 0xcc, 0x00), // yellow
        Color::new(0xcc, 0x66, 0xff), // purple
        Color::new(0x00, 0xe6, 0xe6), // cyan
    ]
}

/// Automatic combat between groups of different players.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CombatConfig {
    /// Maximum centroid distance between groups to engage.
    #[serde(default = "default_combat_range")]
    pub range: f32,
    /// Damage per second = attacker pixel count * this factor.
    #[serde(default = "default_damage_factor")]
    pub pixel_damage_factor: f32,
    /// Per-tick damage clamp per side (0 = unlimited).
    #[serde(default)]
    pub max_pixel_loss_per_tick: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            range: default_combat_range(),
            pixel_damage_factor: default_damage_factor(),
            max_pixel_loss_per_tick: 0.0,
        }
    }
}

fn default_combat_range() -> f32 {
    100.0
}
fn default_damage_factor() -> f32 {
    0.25
}

/// Memory/performance settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PerformanceConfig {
    /// Maximum pixels retained by the recycling pool.
    #[serde(default = "default_max_pooled_pixels")]
    pub max_pooled_pixels: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_pooled_pixels: default_max_pooled_pixels(),
        }
    }
}

fn default_max_pooled_pixels() -> usize {
    10_000
}
