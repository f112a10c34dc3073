//! Simulation entities: pixels, pixel groups, players.

pub mod group;
pub mod pixel;
pub mod player;
pub mod pool;

pub use group::{Distribution, PixelGroup};
pub use pixel::Pixel;
pub use player::Player;
pub use pool::PixelPool;

use glam::Vec2;

/// Anything a selection can resolve to and a client can steer.
///
/// Selections are stored as tagged id references and resolved through this
/// trait at read time, so a referent that disappears between ticks simply
/// resolves to nothing instead of dangling.
pub trait Movable {
    /// Current nominal position.
    fn position(&self) -> Vec2;

    /// Replace the movement target unconditionally.
    fn set_target(&mut self, target: Vec2);
}
