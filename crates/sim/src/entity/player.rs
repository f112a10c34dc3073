//! Player entity: movement, capacity-bounded spawning, selection.

use super::{Distribution, Movable, PixelGroup, PixelPool};
use glam::Vec2;
use protocol::{Color, SelectedEntity};

/// Distance at which a movement target is snapped to exactly.
const SNAP_THRESHOLD: f32 = 1.0;

/// A connected player and its pixel-group army.
#[derive(Debug)]
pub struct Player {
    id: String,
    /// Current position.
    pub position: Vec2,
    target: Option<Vec2>,
    speed: f32,
    /// Display color, assigned from the palette on join.
    pub color: Color,
    /// Owned groups, capacity-bounded by `max_groups`.
    pub pixel_groups: Vec<PixelGroup>,
    max_groups: usize,
    next_group_id: u32,
    selection: Option<SelectedEntity>,
}

impl Player {
    pub fn new(id: impl Into<String>, speed: f32, color: Color, max_groups: usize) -> Self {
        Self {
            id: id.into(),
            position: Vec2::ZERO,
            target: None,
            speed,
            color,
            pixel_groups: Vec::new(),
            max_groups,
            next_group_id: 1,
            selection: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the movement target unconditionally.
    pub fn set_target(&mut self, target: Vec2) {
        self.target = Some(target);
    }

    /// Advance toward the movement target by `dt` seconds, snapping exactly
    /// and clearing the target once within the snap threshold.
    pub fn update(&mut self, dt: f32) {
        let Some(target) = self.target else {
            return;
        };
        let delta = target - self.position;
        let dist = delta.length();
        let step = self.speed * dt;
        if dist <= SNAP_THRESHOLD || step >= dist {
            self.position = target;
            self.target = None;
        } else {
            self.position += delta * (step / dist);
        }
    }

    /// Spawn a new circle-distributed group at the player's position.
    /// Returns the new group's id, or `None` (no state change) at the
    /// ownership cap or for a zero pixel count. Rejecting zero up front
    /// keeps "no pixels" and "destroyed" equivalent for every live group.
    pub fn spawn_pixel_group(
        &mut self,
        pixel_count: u32,
        color: Color,
        pool: &mut PixelPool,
    ) -> Option<u32> {
        if pixel_count == 0 || self.pixel_groups.len() >= self.max_groups {
            return None;
        }
        let id = self.next_group_id;
        self.next_group_id += 1;
        self.pixel_groups.push(PixelGroup::new(
            id,
            pixel_count,
            color,
            Distribution::Circle,
            self.position,
            pool,
        ));
        Some(id)
    }

    /// Store a selection without validating existence. Validation happens
    /// lazily in [`selected_movable`](Self::selected_movable).
    pub fn select_entity(&mut self, selection: SelectedEntity) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Resolve the stored selection against current ownership. A selection
    /// pointing at a group that no longer exists yields `None`, which is
    /// what keeps stale selections safe after cleanup.
    pub fn selected_movable(&mut self) -> Option<&mut dyn Movable> {
        match self.selection? {
            SelectedEntity::SelfPlayer => Some(self),
            SelectedEntity::PixelGroup { id } => self
                .pixel_groups
                .iter_mut()
                .find(|group| group.id == id)
                .map(|group| group as &mut dyn Movable),
        }
    }
}

impl Movable for Player {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_target(&mut self, target: Vec2) {
        Player::set_target(self, target);
    }
}
