//! Authoritative room state and tick orchestration.
//!
//! One `GameState` owns every player in a room and advances them in three
//! ordered phases per tick: movement, combat, cleanup. Destroyed groups
//! stay in their owner's collection until the cleanup phase so the combat
//! scan never mutates a collection it is iterating.

use crate::config::Config;
use crate::entity::{Pixel, PixelPool, Player};
use protocol::{Color, PixelGroupState, PixelState, PlayerState, ServerState};
use std::collections::HashMap;
use tracing::{debug, info};

/// The authoritative aggregate of all players in one room.
#[derive(Debug)]
pub struct GameState {
    config: Config,
    players: HashMap<String, Player>,
    pool: PixelPool,
    /// Palette cursor, advanced as players join.
    next_color: usize,
}

impl GameState {
    pub fn new(config: Config) -> Self {
        let pool = PixelPool::new(config.performance.max_pooled_pixels);
        Self {
            config,
            players: HashMap::new(),
            pool,
            next_color: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Insert a new player at the origin with the next palette color.
    pub fn add_player(&mut self, id: &str) {
        let colors = &self.config.player.colors;
        let color = if colors.is_empty() {
            Color::default()
        } else {
            colors[self.next_color % colors.len()]
        };
        self.next_color += 1;

        let player = Player::new(
            id,
            self.config.player.speed,
            color,
            self.config.spawn.max_groups_per_player,
        );
        self.players.insert(id.to_string(), player);
        info!("Player {} joined ({} players)", id, self.players.len());
    }

    /// Remove a player and drop all its groups. Pixels on this path are not
    /// routed back through the pool; the room is usually closing anyway.
    pub fn remove_player(&mut self, id: &str) {
        if self.players.remove(id).is_some() {
            info!("Player {} left ({} players)", id, self.players.len());
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.players.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Spawn a group for `id` at its current position, in its color.
    /// `None` when the player is unknown or at its group cap.
    pub fn spawn_group_for(&mut self, id: &str, pixel_count: u32) -> Option<u32> {
        let player = self.players.get_mut(id)?;
        let color = player.color;
        let group_id = player.spawn_pixel_group(pixel_count, color, &mut self.pool)?;
        debug!(
            "Spawned group {} ({} pixels) for player {} ({} groups)",
            group_id,
            pixel_count,
            id,
            player.pixel_groups.len()
        );
        Some(group_id)
    }

    /// Advance the whole room by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.update_movement(dt);
        self.resolve_combat(dt);
        self.cleanup();
    }

    /// Movement phase: players toward their targets, then every group's
    /// translation + organic pixel motion.
    fn update_movement(&mut self, dt: f32) {
        for player in self.players.values_mut() {
            player.update(dt);
            for group in &mut player.pixel_groups {
                group.update(dt);
            }
        }
    }

    /// Combat phase: every unordered pair of distinct players, every cross
    /// pair of live groups within engagement range. Damage per side equals
    /// the attacker's own pre-combat pixel count times the damage factor,
    /// both sides applied in the same step — symmetric, order-independent.
    /// Groups reaching zero stay in place (their `apply_damage` becomes a
    /// no-op); removal waits for the cleanup phase.
    fn resolve_combat(&mut self, dt: f32) {
        if self.players.len() < 2 {
            return;
        }

        let range = self.config.combat.range;
        let factor = self.config.combat.pixel_damage_factor;
        let loss_cap = self.config.combat.max_pixel_loss_per_tick;

        let ids = self.player_ids();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let [Some(a), Some(b)] = self.players.get_disjoint_mut([&ids[i], &ids[j]])
                else {
                    continue;
                };

                for gi in 0..a.pixel_groups.len() {
                    for gj in 0..b.pixel_groups.len() {
                        let (damage_to_a, damage_to_b) = {
                            let ga = &a.pixel_groups[gi];
                            let gb = &b.pixel_groups[gj];
                            if ga.is_destroyed()
                                || gb.is_destroyed()
                                || ga.pixel_count() == 0
                                || gb.pixel_count() == 0
                            {
                                continue;
                            }
                            if ga.distance_to(gb) > range {
                                continue;
                            }
                            let mut to_a = gb.pixel_count() as f32 * factor * dt;
                            let mut to_b = ga.pixel_count() as f32 * factor * dt;
                            if loss_cap > 0.0 {
                                to_a = to_a.min(loss_cap);
                                to_b = to_b.min(loss_cap);
                            }
                            (to_a, to_b)
                        };

                        a.pixel_groups[gi].apply_damage(damage_to_a, &mut self.pool);
                        b.pixel_groups[gj].apply_damage(damage_to_b, &mut self.pool);
                    }
                }
            }
        }
    }

    /// Cleanup phase: physically remove groups destroyed this tick.
    fn cleanup(&mut self) {
        for player in self.players.values_mut() {
            player.pixel_groups.retain(|group| !group.is_destroyed());
        }
    }

    /// Serialize the room for remote consumption. Rebuilt fresh on every
    /// call; the result owns all its data.
    pub fn snapshot(&self) -> ServerState {
        let players = self
            .players
            .iter()
            .map(|(id, player)| {
                let pixel_groups = player
                    .pixel_groups
                    .iter()
                    .map(|group| PixelGroupState {
                        id: group.id,
                        pixel_count: group.pixel_count(),
                        distribution_type: group.distribution.as_str().to_string(),
                        pixels: group.pixels.iter().map(pixel_state).collect(),
                    })
                    .collect();
                (
                    id.clone(),
                    PlayerState {
                        id: id.clone(),
                        x: player.position.x,
                        y: player.position.y,
                        pixel_groups,
                    },
                )
            })
            .collect();
        ServerState { players }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &PixelPool {
        &self.pool
    }
}

fn pixel_state(pixel: &Pixel) -> PixelState {
    PixelState {
        x: pixel.position.x,
        y: pixel.position.y,
        color: pixel.color,
    }
}
