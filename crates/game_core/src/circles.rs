use std::ops::RangeInclusive;

use rand::Rng;
use shared::{
    domain::{Circle, RgbHex},
    protocol::CircleOverlay,
};
use tracing::debug;

pub const POSITION_RANGE_PCT: RangeInclusive<u8> = 0..=90;
pub const SIZE_RANGE_PX: RangeInclusive<u8> = 20..=100;

pub fn random_circle<R: Rng + ?Sized>(rng: &mut R) -> Circle {
    Circle {
        x: rng.gen_range(POSITION_RANGE_PCT),
        y: rng.gen_range(POSITION_RANGE_PCT),
        size: rng.gen_range(SIZE_RANGE_PX),
        color: RgbHex::from_bits_truncate(rng.gen_range(0..=RgbHex::MAX)),
    }
}

/// Circles spawned during one session, in insertion order. Never shrinks.
#[derive(Debug, Clone, Default)]
pub struct CircleBoard {
    circles: Vec<Circle>,
}

impl CircleBoard {
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Circle {
        let circle = random_circle(rng);
        self.circles.push(circle);
        debug!(
            x = circle.x,
            y = circle.y,
            size = circle.size,
            color = %circle.color,
            total = self.circles.len(),
            "circle spawned"
        );
        circle
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn overlays(&self) -> Vec<CircleOverlay> {
        self.circles.iter().map(CircleOverlay::from).collect()
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/circles_tests.rs"]
mod tests;
