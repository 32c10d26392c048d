//! Paddle controller port - abstraction for whatever drives the opponent paddle
//!
//! The learning agent is driven directly by the match loop through its
//! two-phase `choose_action` / `record_reward` contract. Every other paddle
//! goes through this port, so scripted opponents can be swapped without
//! touching the simulation.

use crate::{
    pong::{Side, Vec2},
    types::Action,
};

/// What a controller can see of the court on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtView {
    pub ball_position: Vec2,
    pub ball_velocity: Vec2,
    /// Vertical centre of the controlled paddle.
    pub paddle_centre_y: f32,
    /// Side the controlled paddle defends.
    pub side: Side,
    pub court_height: f32,
}

impl CourtView {
    /// Whether the ball is travelling toward this paddle's goal line.
    pub fn ball_approaching(&self) -> bool {
        match self.side {
            Side::Left => self.ball_velocity.x < 0.0,
            Side::Right => self.ball_velocity.x > 0.0,
        }
    }
}

/// Controller trait - unified interface for non-learning paddles
///
/// # Examples
///
/// ```
/// use pong_qlearn::{
///     ports::{CourtView, PaddleController},
///     types::Action,
/// };
///
/// struct Lazy;
///
/// impl PaddleController for Lazy {
///     fn decide(&mut self, _view: &CourtView) -> Action {
///         Action::Stay
///     }
///
///     fn name(&self) -> &str {
///         "Lazy"
///     }
/// }
/// ```
pub trait PaddleController: Send {
    /// Choose the paddle action for this tick.
    fn decide(&mut self, view: &CourtView) -> Action;

    /// Controller name, used in summaries and logs.
    fn name(&self) -> &str;

    /// Seed the controller's internal random number generator.
    ///
    /// Deterministic controllers can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
