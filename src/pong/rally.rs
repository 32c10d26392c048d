//! One match between the learning agent and a scripted opponent.

use serde::{Deserialize, Serialize};

use super::{
    BALL_INITIAL_SPEED, BALL_RADIUS, Ball, PADDLE_HEIGHT, PADDLE_MARGIN, PADDLE_SPEED,
    PADDLE_WIDTH, Paddle, Side, Vec2,
};
use crate::{
    discretizer::{Discretizer, Observation},
    ports::{CourtView, PaddleController},
    q_learning::QLearningAgent,
    reward::{ScoreEvent, StepEvents, moved_without_need, reward},
    types::{Action, DiscreteState},
};

/// Match settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RallyConfig {
    /// Points needed to win the match.
    pub points_to_win: u32,
    /// Side defended by the learning agent.
    pub agent_side: Side,
    /// Seed for the ball's launch directions.
    pub ball_seed: Option<u64>,
}

impl Default for RallyConfig {
    fn default() -> Self {
        Self {
            points_to_win: 10,
            agent_side: Side::Right,
            ball_seed: None,
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub action: Action,
    pub events: StepEvents,
    pub reward: f64,
    /// Side that conceded a point this tick.
    pub conceded: Option<Side>,
    pub match_over: bool,
}

/// Headless match loop.
pub struct Rally {
    config: RallyConfig,
    discretizer: Discretizer,
    ball: Ball,
    agent_paddle: Paddle,
    opponent_paddle: Paddle,
    opponent: Box<dyn PaddleController>,
    agent_points: u32,
    opponent_points: u32,
}

impl Rally {
    pub fn new(
        config: RallyConfig,
        discretizer: Discretizer,
        opponent: Box<dyn PaddleController>,
    ) -> Self {
        let bounds = discretizer.bounds();
        let seed = config.ball_seed.unwrap_or_else(rand::random);
        let paddle_at = |side: Side| {
            let x = match side {
                Side::Left => PADDLE_MARGIN,
                Side::Right => bounds.width - PADDLE_WIDTH - PADDLE_MARGIN,
            };
            let y = bounds.height / 2.0 - PADDLE_HEIGHT / 2.0;
            Paddle::new(x, y, PADDLE_WIDTH, PADDLE_HEIGHT, PADDLE_SPEED, bounds)
        };

        Self {
            ball: Ball::new(BALL_RADIUS, BALL_INITIAL_SPEED, bounds, seed),
            agent_paddle: paddle_at(config.agent_side),
            opponent_paddle: paddle_at(config.agent_side.opposite()),
            config,
            discretizer,
            opponent,
            agent_points: 0,
            opponent_points: 0,
        }
    }

    /// Discretized court as the agent sees it.
    pub fn agent_state(&self) -> DiscreteState {
        let position = self.ball.position();
        let velocity = self.ball.velocity();
        self.discretizer.discretize(&Observation {
            ball_x: position.x,
            ball_y: position.y,
            ball_vx: velocity.x,
            ball_vy: velocity.y,
            controlled_paddle_y: self.agent_paddle.centre_y(),
            opponent_paddle_y: self.opponent_paddle.centre_y(),
        })
    }

    fn opponent_view(&self) -> CourtView {
        CourtView {
            ball_position: self.ball.position(),
            ball_velocity: self.ball.velocity(),
            paddle_centre_y: self.opponent_paddle.centre_y(),
            side: self.config.agent_side.opposite(),
            court_height: self.discretizer.bounds().height,
        }
    }

    /// Advance the match by `dt` seconds.
    ///
    /// The agent chooses from the pre-tick state and receives exactly one
    /// update for that choice, bootstrapped from the state observed after
    /// the physics step and before any ball reset.
    pub fn tick(&mut self, agent: &mut QLearningAgent, dt: f32) -> TickOutcome {
        let state = self.agent_state();
        let action = agent.choose_action(state);
        let opponent_action = self.opponent.decide(&self.opponent_view());

        self.agent_paddle.apply(action, dt);
        self.opponent_paddle.apply(opponent_action, dt);

        let conceded = self.ball.step(dt);
        let mut agent_returned_ball = false;
        if conceded.is_none() {
            agent_returned_ball = self.collide(self.config.agent_side);
            self.collide(self.config.agent_side.opposite());
        }

        let agent_side = self.config.agent_side;
        let events = StepEvents {
            score: match conceded {
                Some(side) if side == agent_side => ScoreEvent::AgentConceded,
                Some(_) => ScoreEvent::AgentScored,
                None => ScoreEvent::None,
            },
            agent_returned_ball,
            agent_moved_without_need: moved_without_need(action, state.ball_vx_sign(), agent_side),
        };
        let reward = reward(&events);
        agent.record_reward(reward, self.agent_state());

        if let Some(side) = conceded {
            if side == agent_side {
                self.opponent_points += 1;
            } else {
                self.agent_points += 1;
            }
            log::debug!(
                "point to {} (agent {} - opponent {})",
                if side == agent_side { "opponent" } else { "agent" },
                self.agent_points,
                self.opponent_points
            );
            self.ball.reset();
        }

        TickOutcome {
            action,
            events,
            reward,
            conceded,
            match_over: self.is_over(),
        }
    }

    /// Bounce the ball off the paddle on `side` if they overlap and the ball
    /// is moving toward it. Returns whether a return happened.
    fn collide(&mut self, side: Side) -> bool {
        let paddle = if side == self.config.agent_side {
            self.agent_paddle.rect()
        } else {
            self.opponent_paddle.rect()
        };
        if !self.ball.rect().intersects(&paddle) {
            return false;
        }
        let velocity = self.ball.velocity();
        let approaching = match side {
            Side::Left => velocity.x < 0.0,
            Side::Right => velocity.x > 0.0,
        };
        if !approaching {
            return false;
        }

        self.ball.bounce_x();
        self.ball.speed_up();
        let radius = self.ball.radius();
        let y = self.ball.position().y;
        let x = match side {
            Side::Left => paddle.right() + radius + 1.0,
            Side::Right => paddle.left - radius - 1.0,
        };
        self.ball.set_position(Vec2::new(x, y));
        true
    }

    /// Start a new match: scores cleared, paddles centred, ball relaunched.
    /// The agent's pending transition is dropped since it belongs to the old
    /// match.
    pub fn restart(&mut self, agent: &mut QLearningAgent) {
        self.agent_points = 0;
        self.opponent_points = 0;
        self.agent_paddle.centre();
        self.opponent_paddle.centre();
        self.ball.reset();
        agent.discard_pending();
    }

    /// Relaunch the ball from the centre without touching the score.
    pub fn relaunch(&mut self, agent: &mut QLearningAgent) {
        self.ball.reset();
        agent.discard_pending();
    }

    pub fn is_over(&self) -> bool {
        self.agent_points >= self.config.points_to_win
            || self.opponent_points >= self.config.points_to_win
    }

    /// Winner of a finished match.
    pub fn winner(&self) -> Option<Side> {
        if self.agent_points >= self.config.points_to_win {
            Some(self.config.agent_side)
        } else if self.opponent_points >= self.config.points_to_win {
            Some(self.config.agent_side.opposite())
        } else {
            None
        }
    }

    pub fn agent_points(&self) -> u32 {
        self.agent_points
    }

    pub fn opponent_points(&self) -> u32 {
        self.opponent_points
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    pub fn agent_paddle(&self) -> &Paddle {
        &self.agent_paddle
    }

    pub fn opponent_paddle(&self) -> &Paddle {
        &self.opponent_paddle
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    pub fn config(&self) -> &RallyConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pong::TrackingController,
        q_learning::{Difficulty, DifficultyProfile},
        types::VelocitySign,
    };

    fn rally() -> Rally {
        Rally::new(
            RallyConfig {
                ball_seed: Some(7),
                ..RallyConfig::default()
            },
            Discretizer::default(),
            Box::new(TrackingController::new("t".to_string())),
        )
    }

    fn agent() -> QLearningAgent {
        QLearningAgent::new(Difficulty::Easy)
            .with_profile(DifficultyProfile::custom(0.1, 0.9, 0.0).unwrap())
            .with_seed(2)
    }

    #[test]
    fn test_tick_leaves_no_pending_transition() {
        let mut rally = rally();
        let mut agent = agent();
        for _ in 0..10 {
            rally.tick(&mut agent, 1.0 / 60.0);
            assert!(!agent.has_pending());
        }
        assert!(agent.explored_state_count() > 0);
    }

    #[test]
    fn test_agent_return_is_rewarded() {
        let mut rally = rally();
        let mut agent = agent();
        let paddle = rally.agent_paddle().rect();
        let ball = rally.ball_mut();
        ball.set_position(Vec2::new(paddle.left - 9.0, paddle.top + 40.0));
        ball.set_velocity(Vec2::new(300.0, 0.0));

        let outcome = rally.tick(&mut agent, 1.0 / 60.0);

        assert!(outcome.events.agent_returned_ball);
        assert_eq!(outcome.conceded, None);
        assert!(rally.ball().velocity().x < 0.0);
        assert!(outcome.reward >= 5.0);
    }

    #[test]
    fn test_conceding_scores_and_penalises() {
        let mut rally = rally();
        let mut agent = agent();
        let ball = rally.ball_mut();
        ball.set_position(Vec2::new(795.0, 20.0));
        ball.set_velocity(Vec2::new(300.0, 0.0));

        let outcome = rally.tick(&mut agent, 1.0 / 60.0);

        assert_eq!(outcome.conceded, Some(Side::Right));
        assert_eq!(outcome.events.score, ScoreEvent::AgentConceded);
        assert!(outcome.reward <= -20.0);
        assert_eq!(rally.opponent_points(), 1);
        assert_eq!(rally.ball().position(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_wasted_move_uses_pre_tick_direction() {
        let mut rally = rally();
        let mut agent = QLearningAgent::new(Difficulty::Easy)
            .with_profile(DifficultyProfile::custom(0.1, 0.9, 0.0).unwrap())
            .with_seed(2);
        let ball = rally.ball_mut();
        ball.set_position(Vec2::new(400.0, 300.0));
        ball.set_velocity(Vec2::new(-300.0, 0.0));
        let state = rally.agent_state();
        assert_eq!(state.ball_vx_sign(), VelocitySign::Negative);

        let outcome = rally.tick(&mut agent, 1.0 / 60.0);

        assert_eq!(outcome.events.agent_moved_without_need, outcome.action.is_move());
    }

    #[test]
    fn test_match_ends_at_points_to_win() {
        let mut rally = Rally::new(
            RallyConfig {
                points_to_win: 1,
                agent_side: Side::Right,
                ball_seed: Some(1),
            },
            Discretizer::default(),
            Box::new(TrackingController::new("t".to_string())),
        );
        let mut agent = agent();
        let ball = rally.ball_mut();
        ball.set_position(Vec2::new(5.0, 20.0));
        ball.set_velocity(Vec2::new(-300.0, 0.0));

        let outcome = rally.tick(&mut agent, 1.0 / 60.0);

        assert!(outcome.match_over);
        assert_eq!(outcome.events.score, ScoreEvent::AgentScored);
        assert_eq!(rally.winner(), Some(Side::Right));

        rally.restart(&mut agent);
        assert!(!rally.is_over());
        assert_eq!(rally.agent_points(), 0);
    }
}
