//! Pixel group: a player-owned cluster of pixels acting as one combat unit.

use super::{Movable, Pixel, PixelPool};
use glam::Vec2;
use protocol::Color;
use rand::Rng;
use std::f32::consts::TAU;

/// Group translation speed in units per second.
const GROUP_SPEED: f32 = 80.0;
/// Distance at which a movement target is snapped to exactly.
const SNAP_THRESHOLD: f32 = 1.0;
/// Upper bound on the per-pixel wander radius.
const MAX_MOVE_RADIUS: f32 = 20.0;
/// Upper bound on the initial distribution radius.
const MAX_SPREAD_RADIUS: f32 = 60.0;
/// Pixels per sub-cluster in the cluster distribution.
const PIXELS_PER_CLUSTER: u32 = 20;

/// Initial pixel placement pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// Uniform-area disk.
    #[default]
    Circle,
    /// A few dense sub-clusters on a ring.
    Cluster,
}

impl Distribution {
    /// Tag emitted in snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Distribution::Circle => "circle",
            Distribution::Cluster => "cluster",
        }
    }
}

/// A cohesive, movable cluster of pixels.
///
/// The group carries both a nominal `center` (what movement steers) and a
/// tracked centroid of live pixels (what combat measures distance between,
/// more representative once pixels have drifted). Damage accrues a
/// fractional remainder so sub-pixel damage is lossless across ticks.
#[derive(Debug)]
pub struct PixelGroup {
    /// Unique id within the owning player.
    pub id: u32,
    pixel_count: u32,
    pub pixels: Vec<Pixel>,
    /// Nominal center, moved by group translation.
    pub center: Vec2,
    /// Mean of live pixel positions, recomputed each update.
    centroid: Option<Vec2>,
    target: Option<Vec2>,
    speed: f32,
    destroyed: bool,
    damage_remainder: f32,
    pub distribution: Distribution,
    /// Per-pixel wander radius, derived from the pixel count.
    pub move_radius: f32,
    /// Initial distribution radius, derived from the pixel count.
    pub spread_radius: f32,
}

impl PixelGroup {
    /// Create a group of `pixel_count` pixels distributed around `origin`,
    /// drawing pixel instances from the pool.
    pub fn new(
        id: u32,
        pixel_count: u32,
        color: Color,
        distribution: Distribution,
        origin: Vec2,
        pool: &mut PixelPool,
    ) -> Self {
        let move_radius = Self::pixel_move_radius(pixel_count);
        let spread_radius = Self::spread_radius_for(pixel_count);

        let mut rng = rand::rng();
        let mut pixels = Vec::with_capacity(pixel_count as usize);
        for _ in 0..pixel_count {
            let offset = match distribution {
                Distribution::Circle => {
                    let angle = rng.random_range(0.0..TAU);
                    // Square-root scaling gives uniform area coverage.
                    let radius = rng.random::<f32>().sqrt() * spread_radius;
                    Vec2::new(angle.cos(), angle.sin()) * radius
                }
                Distribution::Cluster => {
                    let cluster_count = (pixel_count / PIXELS_PER_CLUSTER).max(1);
                    let index = rng.random_range(0..cluster_count);
                    let cluster_angle = index as f32 / cluster_count as f32 * TAU;
                    let cluster_center =
                        Vec2::new(cluster_angle.cos(), cluster_angle.sin()) * spread_radius * 0.4;
                    cluster_center
                        + Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0))
                }
            };
            let position = origin + offset;
            pixels.push(pool.acquire(position.x, position.y, move_radius, color));
        }

        Self {
            id,
            pixel_count,
            pixels,
            center: origin,
            centroid: None,
            target: None,
            speed: GROUP_SPEED,
            destroyed: false,
            damage_remainder: 0.0,
            distribution,
            move_radius,
            spread_radius,
        }
    }

    /// Wander radius for a group of `n` pixels: grows with sqrt(n), damped
    /// by a log factor so large groups stay visually tight.
    fn pixel_move_radius(n: u32) -> f32 {
        if n == 0 {
            return 0.0;
        }
        let n = n as f32;
        let radius = 3.0 * n.sqrt() / (n.log10() * 0.5).max(1.0);
        radius.min(MAX_MOVE_RADIUS)
    }

    /// Initial spread radius for a group of `n` pixels.
    fn spread_radius_for(n: u32) -> f32 {
        let radius = 10.0 + 2.0 * (n as f32).sqrt();
        radius.min(MAX_SPREAD_RADIUS)
    }

    /// Advance the group by `dt` seconds: translate toward the movement
    /// target, run each pixel's organic wander, retrack the centroid.
    pub fn update(&mut self, dt: f32) {
        if let Some(target) = self.target {
            let delta = target - self.center;
            let dist = delta.length();
            let step = self.speed * dt;
            if dist <= SNAP_THRESHOLD || step >= dist {
                self.translate(delta);
                self.center = target; // exact, no float drift
                self.target = None;
            } else {
                self.translate(delta * (step / dist));
            }
        }

        for pixel in &mut self.pixels {
            pixel.update(dt);
        }

        self.centroid = if self.pixels.is_empty() {
            None
        } else {
            let sum: Vec2 = self.pixels.iter().map(|p| p.position).sum();
            Some(sum / self.pixels.len() as f32)
        };
    }

    /// Shift the whole group: nominal center plus every pixel's position,
    /// anchor and wander target.
    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
        for pixel in &mut self.pixels {
            pixel.translate(delta);
        }
    }

    /// Apply `raw_damage`, returning the number of whole pixels destroyed.
    ///
    /// The fractional part is carried to the next call, so repeated
    /// sub-pixel damage is lossless. Removed pixels go back to the pool.
    /// Reaching zero marks the group destroyed and clears the collection;
    /// physical removal from the owner is deferred to the cleanup phase.
    pub fn apply_damage(&mut self, raw_damage: f32, pool: &mut PixelPool) -> u32 {
        if self.destroyed || self.pixel_count == 0 || raw_damage <= 0.0 {
            return 0;
        }

        let total = self.damage_remainder + raw_damage;
        let loss = (total.floor() as u32).min(self.pixel_count);
        self.damage_remainder = total.fract();

        if loss == 0 {
            return 0;
        }

        self.pixel_count -= loss;
        let keep = self.pixels.len() - loss as usize;
        pool.release_all(self.pixels.drain(keep..));

        if self.pixel_count == 0 {
            self.destroyed = true;
            pool.release_all(self.pixels.drain(..));
            self.damage_remainder = 0.0;
        }

        loss
    }

    /// Distance between this group's combat position and another's.
    pub fn distance_to(&self, other: &PixelGroup) -> f32 {
        self.combat_position().distance(other.combat_position())
    }

    /// Tracked centroid, falling back to the nominal center while the
    /// group has no pixels.
    pub fn combat_position(&self) -> Vec2 {
        self.centroid.unwrap_or(self.center)
    }

    pub fn pixel_count(&self) -> u32 {
        self.pixel_count
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Movable for PixelGroup {
    fn position(&self) -> Vec2 {
        self.center
    }

    fn set_target(&mut self, target: Vec2) {
        self.target = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(count: u32, pool: &mut PixelPool) -> PixelGroup {
        PixelGroup::new(
            1,
            count,
            Color::new(255, 77, 77),
            Distribution::Circle,
            Vec2::ZERO,
            pool,
        )
    }

    #[test]
    fn test_initialization_count_and_spread() {
        let mut pool = PixelPool::new(1000);
        for distribution in [Distribution::Circle, Distribution::Cluster] {
            let group = PixelGroup::new(1, 50, Color::default(), distribution, Vec2::ZERO, &mut pool);
            assert_eq!(group.pixel_count(), 50);
            assert_eq!(group.pixels.len(), 50);
            // Cluster jitter can poke slightly past the ring.
            let bound = group.spread_radius + 15.0;
            for pixel in &group.pixels {
                assert!(pixel.position.length() <= bound);
            }
        }
    }

    #[test]
    fn test_radius_formulas_are_capped() {
        assert!(PixelGroup::pixel_move_radius(10_000) <= MAX_MOVE_RADIUS);
        assert!(PixelGroup::spread_radius_for(10_000) <= MAX_SPREAD_RADIUS);
        // Small groups: log damping inactive, 3 * sqrt(n).
        assert!((PixelGroup::pixel_move_radius(4) - 6.0).abs() < 1e-5);
        assert!((PixelGroup::spread_radius_for(25) - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_damage_remainder_is_lossless() {
        let mut pool = PixelPool::new(1000);
        let mut group = group(100, &mut pool);
        let mut destroyed = 0;
        for _ in 0..4 {
            destroyed += group.apply_damage(0.5, &mut pool);
        }
        // floor(4 * 0.5) whole pixels across the four calls.
        assert_eq!(destroyed, 2);
        assert_eq!(group.pixel_count(), 98);
        assert_eq!(group.pixels.len(), 98);
    }

    #[test]
    fn test_damage_ignores_non_positive_and_destroyed() {
        let mut pool = PixelPool::new(1000);
        let mut group = group(5, &mut pool);
        assert_eq!(group.apply_damage(0.0, &mut pool), 0);
        assert_eq!(group.apply_damage(-3.0, &mut pool), 0);
        assert_eq!(group.pixel_count(), 5);

        assert_eq!(group.apply_damage(100.0, &mut pool), 5);
        assert!(group.is_destroyed());
        assert_eq!(group.apply_damage(10.0, &mut pool), 0);
    }

    #[test]
    fn test_destruction_clears_pixels_and_releases_to_pool() {
        let mut pool = PixelPool::new(1000);
        let mut group = group(10, &mut pool);
        assert_eq!(pool.len(), 0);
        group.apply_damage(10.0, &mut pool);
        assert!(group.is_destroyed());
        assert_eq!(group.pixel_count(), 0);
        assert!(group.pixels.is_empty());
        assert_eq!(pool.len(), 10);
    }

    #[test]
    fn test_count_never_goes_negative() {
        let mut pool = PixelPool::new(1000);
        let mut group = group(3, &mut pool);
        assert_eq!(group.apply_damage(1e6, &mut pool), 3);
        assert_eq!(group.pixel_count(), 0);
    }

    #[test]
    fn test_group_translation_moves_pixels_and_snaps() {
        let mut pool = PixelPool::new(1000);
        let mut group = group(20, &mut pool);
        let before: Vec<Vec2> = group.pixels.iter().map(|p| p.anchor).collect();

        group.set_target(Vec2::new(40.0, 0.0));
        group.update(0.25); // 80 units/s * 0.25s = 20 units
        assert!((group.center.x - 20.0).abs() < 1e-3);
        for (pixel, old) in group.pixels.iter().zip(&before) {
            assert!((pixel.anchor.x - (old.x + 20.0)).abs() < 1e-3);
        }

        // Second quarter second covers the rest exactly; target cleared.
        group.update(0.25);
        assert!((group.center.x - 40.0).abs() < 1e-3);
        group.update(0.25);
        assert_eq!(group.center, Vec2::new(40.0, 0.0));
    }

    #[test]
    fn test_target_within_snap_threshold_is_reached_exactly() {
        let mut pool = PixelPool::new(1000);
        let mut group = group(5, &mut pool);
        group.set_target(Vec2::new(0.5, 0.0));
        group.update(1.0 / 60.0);
        assert_eq!(group.center, Vec2::new(0.5, 0.0));
        assert!(group.target.is_none());
    }

    #[test]
    fn test_centroid_tracks_pixels() {
        let mut pool = PixelPool::new(1000);
        let mut group = group(30, &mut pool);
        group.update(1.0 / 60.0);
        let centroid = group.combat_position();
        // Mean of a symmetric distribution around the origin stays close.
        assert!(centroid.length() < group.spread_radius);

        let mut other = PixelGroup::new(
            2,
            30,
            Color::default(),
            Distribution::Circle,
            Vec2::new(50.0, 0.0),
            &mut pool,
        );
        other.update(1.0 / 60.0);
        let dist = group.distance_to(&other);
        assert!((dist - 50.0).abs() < 2.0 * group.spread_radius);
    }
}
