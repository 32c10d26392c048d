use std::f32::consts::FRAC_PI_4;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{BALL_SPEEDUP, Rect, Side, Vec2};
use crate::discretizer::CourtBounds;

/// Ball with its own launch-direction random source.
#[derive(Debug, Clone)]
pub struct Ball {
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    initial_speed: f32,
    bounds: CourtBounds,
    rng: StdRng,
}

impl Ball {
    /// Create a ball at the centre of the court, already launched.
    pub fn new(radius: f32, initial_speed: f32, bounds: CourtBounds, seed: u64) -> Self {
        let mut ball = Self {
            position: Vec2::default(),
            velocity: Vec2::default(),
            radius,
            initial_speed,
            bounds,
            rng: StdRng::seed_from_u64(seed),
        };
        ball.reset();
        ball
    }

    /// Re-centre and launch along one of the four diagonals.
    pub fn reset(&mut self) {
        self.position = Vec2::new(self.bounds.width / 2.0, self.bounds.height / 2.0);
        let angle = match self.rng.random_range(0..4) {
            0 => FRAC_PI_4,
            1 => 3.0 * FRAC_PI_4,
            2 => 5.0 * FRAC_PI_4,
            _ => 7.0 * FRAC_PI_4,
        };
        self.velocity = Vec2::new(angle.cos() * self.initial_speed, angle.sin() * self.initial_speed);
    }

    /// Advance by `dt` seconds, reflecting off the top and bottom walls.
    ///
    /// Returns the side whose goal line the ball crossed. The ball is left
    /// where it is; the caller decides when to [`reset`](Self::reset).
    pub fn step(&mut self, dt: f32) -> Option<Side> {
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;

        if self.position.y - self.radius < 0.0 {
            self.position.y = self.radius;
            self.bounce_y();
        } else if self.position.y + self.radius > self.bounds.height {
            self.position.y = self.bounds.height - self.radius;
            self.bounce_y();
        }

        if self.position.x - self.radius < 0.0 {
            Some(Side::Left)
        } else if self.position.x + self.radius > self.bounds.width {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub fn bounce_x(&mut self) {
        self.velocity.x = -self.velocity.x;
    }

    pub fn bounce_y(&mut self) {
        self.velocity.y = -self.velocity.y;
    }

    pub fn speed_up(&mut self) {
        self.velocity.x *= BALL_SPEEDUP;
        self.velocity.y *= BALL_SPEEDUP;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Bounding box of the ball.
    pub fn rect(&self) -> Rect {
        Rect {
            left: self.position.x - self.radius,
            top: self.position.y - self.radius,
            width: self.radius * 2.0,
            height: self.radius * 2.0,
        }
    }
}
