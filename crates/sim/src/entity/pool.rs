//! Pixel recycling pool.
//!
//! Groups churn through thousands of pixels under combat; the pool hands
//! out ready-to-use instances and reclaims them without reallocation, up to
//! a retention cap. Beyond the cap it degrades to plain allocate-and-drop.

use super::Pixel;
use protocol::Color;

/// Bounded free-list recycler for [`Pixel`] instances.
#[derive(Debug)]
pub struct PixelPool {
    pool: Vec<Pixel>,
    max_size: usize,
}

impl PixelPool {
    /// Create a pool retaining at most `max_size` pixels.
    pub fn new(max_size: usize) -> Self {
        Self {
            pool: Vec::new(),
            max_size,
        }
    }

    /// Take a pixel from the pool, or construct one if the pool is empty.
    /// The caller cannot tell a reused instance from a fresh one.
    pub fn acquire(&mut self, x: f32, y: f32, move_radius: f32, color: Color) -> Pixel {
        match self.pool.pop() {
            Some(mut pixel) => {
                pixel.reset(x, y, move_radius, color);
                pixel
            }
            None => Pixel::new(x, y, move_radius, color),
        }
    }

    /// Return a pixel to the pool. Dropped if the pool is at capacity.
    pub fn release(&mut self, pixel: Pixel) {
        if self.pool.len() < self.max_size {
            self.pool.push(pixel);
        }
    }

    /// Return a batch of pixels to the pool.
    pub fn release_all<I: IntoIterator<Item = Pixel>>(&mut self, pixels: I) {
        for pixel in pixels {
            self.release(pixel);
        }
    }

    /// Current retained count, for diagnostics.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_acquire_reuses_and_fully_resets() {
        let mut pool = PixelPool::new(8);
        let mut pixel = pool.acquire(1.0, 2.0, 5.0, Color::new(1, 2, 3));
        pixel.position = Vec2::new(99.0, 99.0);
        pixel.target = Some(Vec2::new(1.0, 1.0));
        pool.release(pixel);
        assert_eq!(pool.len(), 1);

        let reused = pool.acquire(-3.0, 4.0, 2.0, Color::new(9, 9, 9));
        assert_eq!(pool.len(), 0);
        assert_eq!(reused.position, Vec2::new(-3.0, 4.0));
        assert_eq!(reused.anchor, Vec2::new(-3.0, 4.0));
        assert_eq!(reused.move_radius, 2.0);
        assert_eq!(reused.color, Color::new(9, 9, 9));
        assert!(reused.target.is_none());
    }

    #[test]
    fn test_release_drops_beyond_cap() {
        let mut pool = PixelPool::new(2);
        for _ in 0..5 {
            pool.release(Pixel::new(0.0, 0.0, 1.0, Color::default()));
        }
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_release_all() {
        let mut pool = PixelPool::new(16);
        let pixels: Vec<Pixel> = (0..4)
            .map(|i| Pixel::new(i as f32, 0.0, 1.0, Color::default()))
            .collect();
        pool.release_all(pixels);
        assert_eq!(pool.len(), 4);
    }
}
