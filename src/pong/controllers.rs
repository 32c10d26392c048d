//! Scripted opponents for the learning paddle.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{CourtView, PaddleController},
    q_learning::policy::random_action,
    types::Action,
};

/// Follows the ball while it approaches, drifts back to centre otherwise.
#[derive(Debug, Clone)]
pub struct TrackingController {
    name: String,
    dead_zone: f32,
}

impl TrackingController {
    pub const DEFAULT_DEAD_ZONE: f32 = 10.0;

    pub fn new(name: String) -> Self {
        Self {
            name,
            dead_zone: Self::DEFAULT_DEAD_ZONE,
        }
    }

    fn steer(&self, from: f32, to: f32) -> Action {
        let offset = to - from;
        if offset > self.dead_zone {
            Action::Down
        } else if offset < -self.dead_zone {
            Action::Up
        } else {
            Action::Stay
        }
    }
}

impl PaddleController for TrackingController {
    fn decide(&mut self, view: &CourtView) -> Action {
        let target = if view.ball_approaching() {
            view.ball_position.y
        } else {
            view.court_height / 2.0
        };
        self.steer(view.paddle_centre_y, target)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Uniformly random actions.
#[derive(Debug, Clone)]
pub struct RandomController {
    name: String,
    rng: StdRng,
}

impl RandomController {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PaddleController for RandomController {
    fn decide(&mut self, _view: &CourtView) -> Action {
        random_action(&mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Opponent selectable from configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    #[default]
    Tracking,
    Random,
}

impl ControllerKind {
    /// Instantiate the controller, seeding it when a seed is given.
    pub fn build(self, seed: Option<u64>) -> Box<dyn PaddleController> {
        let mut controller: Box<dyn PaddleController> = match self {
            ControllerKind::Tracking => Box::new(TrackingController::new("Tracking".to_string())),
            ControllerKind::Random => Box::new(RandomController::new("Random".to_string())),
        };
        if let Some(seed) = seed {
            controller.set_rng_seed(seed);
        }
        controller
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControllerKind::Tracking => "tracking",
            ControllerKind::Random => "random",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControllerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracking" => Ok(ControllerKind::Tracking),
            "random" => Ok(ControllerKind::Random),
            _ => Err(Error::ParseController {
                input: s.to_string(),
                expected: "tracking, random".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pong::{Side, Vec2};

    fn view(ball_y: f32, ball_vx: f32, paddle_y: f32) -> CourtView {
        CourtView {
            ball_position: Vec2::new(200.0, ball_y),
            ball_velocity: Vec2::new(ball_vx, 100.0),
            paddle_centre_y: paddle_y,
            side: Side::Left,
            court_height: 600.0,
        }
    }

    #[test]
    fn test_tracking_follows_approaching_ball() {
        let mut tracker = TrackingController::new("t".to_string());
        assert_eq!(tracker.decide(&view(100.0, -300.0, 300.0)), Action::Up);
        assert_eq!(tracker.decide(&view(500.0, -300.0, 300.0)), Action::Down);
        assert_eq!(tracker.decide(&view(305.0, -300.0, 300.0)), Action::Stay);
    }

    #[test]
    fn test_tracking_recentres_when_ball_leaves() {
        let mut tracker = TrackingController::new("t".to_string());
        assert_eq!(tracker.decide(&view(100.0, 300.0, 500.0)), Action::Up);
        assert_eq!(tracker.decide(&view(100.0, 300.0, 300.0)), Action::Stay);
    }

    #[test]
    fn test_seeded_random_controller_is_reproducible() {
        let mut a = RandomController::with_seed("a".to_string(), 4);
        let mut b = ControllerKind::Random.build(Some(4));
        for _ in 0..100 {
            let v = view(0.0, 0.0, 0.0);
            assert_eq!(a.decide(&v), b.decide(&v));
        }
    }

    #[test]
    fn test_parse_controller_kind() {
        assert_eq!("Tracking".parse::<ControllerKind>().unwrap(), ControllerKind::Tracking);
        assert!(matches!(
            "wall".parse::<ControllerKind>(),
            Err(Error::ParseController { .. })
        ));
    }
}
