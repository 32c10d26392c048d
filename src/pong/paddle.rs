use super::Rect;
use crate::{discretizer::CourtBounds, types::Action};

/// Vertical paddle whose top edge stays inside the court.
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    speed: f32,
    court_height: f32,
}

impl Paddle {
    /// Create a paddle with its top-left corner at `(x, y)`.
    pub fn new(x: f32, y: f32, width: f32, height: f32, speed: f32, bounds: CourtBounds) -> Self {
        let mut paddle = Self {
            x,
            y,
            width,
            height,
            speed,
            court_height: bounds.height,
        };
        paddle.clamp();
        paddle
    }

    pub fn move_up(&mut self, dt: f32) {
        self.y -= self.speed * dt;
        self.clamp();
    }

    pub fn move_down(&mut self, dt: f32) {
        self.y += self.speed * dt;
        self.clamp();
    }

    /// Apply one tick of `action`.
    pub fn apply(&mut self, action: Action, dt: f32) {
        match action {
            Action::Stay => {}
            Action::Up => self.move_up(dt),
            Action::Down => self.move_down(dt),
        }
    }

    /// Move so the paddle is vertically centred on the court.
    pub fn centre(&mut self) {
        self.y = (self.court_height - self.height) / 2.0;
    }

    fn clamp(&mut self) {
        self.y = self.y.clamp(0.0, (self.court_height - self.height).max(0.0));
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn centre_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect {
            left: self.x,
            top: self.y,
            width: self.width,
            height: self.height,
        }
    }
}
