//! Headless court simulation
//!
//! Provides the physical collaborators of the learning agent:
//! - [`Ball`] with wall reflection and goal-line detection
//! - [`Paddle`] with clamped vertical movement
//! - [`Rally`], a full match loop wiring the agent, an opponent controller
//!   and the reward function together
//!
//! Nothing here is rendered; positions are in pixels of an 800×600 court.

pub mod ball;
pub mod controllers;
pub mod paddle;
pub mod rally;

use serde::{Deserialize, Serialize};

pub use ball::Ball;
pub use controllers::{ControllerKind, RandomController, TrackingController};
pub use paddle::Paddle;
pub use rally::{Rally, RallyConfig, TickOutcome};

pub const PADDLE_WIDTH: f32 = 15.0;
pub const PADDLE_HEIGHT: f32 = 80.0;
pub const PADDLE_SPEED: f32 = 400.0;
/// Horizontal gap between a paddle and its goal line.
pub const PADDLE_MARGIN: f32 = 20.0;
pub const BALL_RADIUS: f32 = 8.0;
pub const BALL_INITIAL_SPEED: f32 = 300.0;
/// Ball velocity multiplier applied on every paddle return.
pub const BALL_SPEEDUP: f32 = 1.05;

/// Side of the court a paddle defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// 2D vector in court coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Strict overlap test; touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection() {
        let a = Rect {
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let b = Rect {
            left: 5.0,
            top: 5.0,
            width: 10.0,
            height: 10.0,
        };
        let c = Rect {
            left: 10.0,
            top: 0.0,
            width: 5.0,
            height: 5.0,
        };
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }
}
