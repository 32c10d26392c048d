//! Core value types shared by the agent, the discretizer and the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of actions available to the controlled paddle.
pub const ACTION_COUNT: usize = 3;

/// Default number of horizontal buckets for the ball position.
pub const GRID_X_DIVISIONS: u16 = 10;

/// Default number of vertical buckets for the ball position.
pub const GRID_Y_DIVISIONS: u16 = 10;

/// Default number of vertical buckets for paddle positions.
pub const PADDLE_Y_DIVISIONS: u16 = 10;

/// Action taken by a paddle for one tick.
///
/// The discriminant is the index into a value vector and the column order of
/// the persisted table, so it must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    Stay = 0,
    Up = 1,
    Down = 2,
}

impl Action {
    /// All actions in ordinal order.
    pub const ALL: [Action; ACTION_COUNT] = [Action::Stay, Action::Up, Action::Down];

    /// Index of this action inside a value vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up an action by its ordinal.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this action moves the paddle.
    pub fn is_move(self) -> bool {
        self != Action::Stay
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Stay => "stay",
            Action::Up => "up",
            Action::Down => "down",
        };
        f.write_str(name)
    }
}

/// Direction of a velocity component with the magnitude thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i8)]
pub enum VelocitySign {
    Negative = -1,
    Zero = 0,
    Positive = 1,
}

impl VelocitySign {
    /// Sign of a continuous velocity component. Exactly zero maps to `Zero`.
    pub fn of(velocity: f32) -> Self {
        if velocity > 0.0 {
            VelocitySign::Positive
        } else if velocity < 0.0 {
            VelocitySign::Negative
        } else {
            VelocitySign::Zero
        }
    }

    /// Integer form used in the persisted table.
    pub const fn value(self) -> i8 {
        self as i8
    }

    /// Parse the integer form, rejecting anything outside `{-1, 0, 1}`.
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            -1 => Some(VelocitySign::Negative),
            0 => Some(VelocitySign::Zero),
            1 => Some(VelocitySign::Positive),
            _ => None,
        }
    }
}

impl fmt::Display for VelocitySign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Discretized snapshot of the court as seen by the learning agent.
///
/// Used as the key of the value table: equality, ordering and hashing cover
/// all six fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscreteState {
    ball_x_bucket: u16,
    ball_y_bucket: u16,
    ball_vx_sign: VelocitySign,
    ball_vy_sign: VelocitySign,
    controlled_paddle_bucket: u16,
    opponent_paddle_bucket: u16,
}

impl DiscreteState {
    /// Create a state from already-bucketed components.
    pub const fn new(
        ball_x_bucket: u16,
        ball_y_bucket: u16,
        ball_vx_sign: VelocitySign,
        ball_vy_sign: VelocitySign,
        controlled_paddle_bucket: u16,
        opponent_paddle_bucket: u16,
    ) -> Self {
        Self {
            ball_x_bucket,
            ball_y_bucket,
            ball_vx_sign,
            ball_vy_sign,
            controlled_paddle_bucket,
            opponent_paddle_bucket,
        }
    }

    pub fn ball_x_bucket(&self) -> u16 {
        self.ball_x_bucket
    }

    pub fn ball_y_bucket(&self) -> u16 {
        self.ball_y_bucket
    }

    pub fn ball_vx_sign(&self) -> VelocitySign {
        self.ball_vx_sign
    }

    pub fn ball_vy_sign(&self) -> VelocitySign {
        self.ball_vy_sign
    }

    pub fn controlled_paddle_bucket(&self) -> u16 {
        self.controlled_paddle_bucket
    }

    pub fn opponent_paddle_bucket(&self) -> u16 {
        self.opponent_paddle_bucket
    }
}

/// Space separated, in the column order of the persisted table.
impl fmt::Display for DiscreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.ball_x_bucket,
            self.ball_y_bucket,
            self.ball_vx_sign,
            self.ball_vy_sign,
            self.controlled_paddle_bucket,
            self.opponent_paddle_bucket
        )
    }
}

/// Default reward components.
pub mod reward {
    /// Agent paddle sent the ball back.
    pub const RETURN: f64 = 10.0;

    /// Ball crossed the agent's goal line.
    pub const CONCEDE: f64 = -20.0;

    /// Agent moved while the ball was travelling away from it.
    pub const WASTED_MOVE: f64 = -5.0;
}
