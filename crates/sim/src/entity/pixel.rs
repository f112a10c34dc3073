//! Individual pixel with bounded organic wander motion.

use glam::Vec2;
use protocol::Color;
use rand::Rng;
use std::f32::consts::TAU;

/// Update rate the wander speed is tuned against (steps per second).
const BASELINE_UPDATE_RATE: f32 = 60.0;
/// Per-update wander step at the baseline rate.
const DEFAULT_MOVE_SPEED: f32 = 0.2;
/// Distance at which a wander target counts as reached.
const ARRIVE_THRESHOLD: f32 = 0.5;

/// The smallest simulation unit: one pixel of a group.
///
/// A pixel wanders organically around its anchor, never drifting farther
/// than `move_radius` from it. Owned exclusively by one pixel group and
/// recycled through the pool on removal.
#[derive(Debug, Clone)]
pub struct Pixel {
    /// Current position.
    pub position: Vec2,
    /// Anchor the wander motion is centered on.
    pub anchor: Vec2,
    /// Maximum distance from the anchor.
    pub move_radius: f32,
    /// Wander step per update at the baseline rate.
    pub move_speed: f32,
    /// Display color.
    pub color: Color,
    /// Current wander target, if any.
    pub target: Option<Vec2>,
}

impl Pixel {
    /// Create a new pixel anchored at (`x`, `y`).
    pub fn new(x: f32, y: f32, move_radius: f32, color: Color) -> Self {
        let mut pixel = Self {
            position: Vec2::ZERO,
            anchor: Vec2::ZERO,
            move_radius: 0.0,
            move_speed: 0.0,
            color,
            target: None,
        };
        pixel.reset(x, y, move_radius, color);
        pixel
    }

    /// Reinitialize every field in place. A pooled pixel after `reset` is
    /// indistinguishable from a freshly constructed one.
    pub fn reset(&mut self, x: f32, y: f32, move_radius: f32, color: Color) {
        self.position = Vec2::new(x, y);
        self.anchor = Vec2::new(x, y);
        self.move_radius = move_radius;
        self.move_speed = DEFAULT_MOVE_SPEED;
        self.color = color;
        self.target = None;
    }

    /// Pick a new wander target: random angle, radius in [50%, 100%] of
    /// `move_radius`, centered on the anchor.
    pub fn generate_target(&mut self) {
        let mut rng = rand::rng();
        let angle = rng.random_range(0.0..TAU);
        let radius = self.move_radius * rng.random_range(0.5..=1.0);
        self.target = Some(self.anchor + Vec2::new(angle.cos(), angle.sin()) * radius);
    }

    /// Advance the wander motion by `dt` seconds.
    ///
    /// Without a target one is generated for the next call. With one, the
    /// pixel steps toward it at `move_speed` normalized to the baseline
    /// update rate; the target is cleared on arrival, and the position is
    /// clamped back to the `move_radius` boundary (clearing the target) if
    /// the step breached it.
    pub fn update(&mut self, dt: f32) {
        let Some(target) = self.target else {
            self.generate_target();
            return;
        };

        let delta = target - self.position;
        let dist = delta.length();
        if dist <= ARRIVE_THRESHOLD {
            self.target = None;
            return;
        }

        let step = self.move_speed * dt * BASELINE_UPDATE_RATE;
        self.position += delta / dist * step.min(dist);

        let offset = self.position - self.anchor;
        if offset.length() > self.move_radius {
            self.position = self.anchor + offset.normalize() * self.move_radius;
            self.target = None;
        }
    }

    /// Shift position, anchor and wander target together (group translation).
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        self.anchor += delta;
        if let Some(target) = self.target.as_mut() {
            *target += delta;
        }
    }
}
