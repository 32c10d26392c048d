//! Reward shaping for the learning paddle.

use serde::{Deserialize, Serialize};

use crate::{
    pong::Side,
    types::{Action, VelocitySign, reward},
};

/// Scoring outcome of a tick from the agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreEvent {
    #[default]
    None,
    AgentScored,
    AgentConceded,
}

/// Everything that happened to the agent during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepEvents {
    pub score: ScoreEvent,
    pub agent_returned_ball: bool,
    pub agent_moved_without_need: bool,
}

/// Sum of the reward components that fired.
pub fn reward(events: &StepEvents) -> f64 {
    let mut total = 0.0;
    if events.agent_returned_ball {
        total += reward::RETURN;
    }
    if events.score == ScoreEvent::AgentConceded {
        total += reward::CONCEDE;
    }
    if events.agent_moved_without_need {
        total += reward::WASTED_MOVE;
    }
    total
}

/// Whether `action` moved the paddle while the ball was heading away from
/// the agent's side of the court.
pub fn moved_without_need(action: Action, ball_vx_sign: VelocitySign, side: Side) -> bool {
    let moving_away = match side {
        Side::Left => ball_vx_sign == VelocitySign::Positive,
        Side::Right => ball_vx_sign == VelocitySign::Negative,
    };
    action.is_move() && moving_away
}
