//! Mapping from continuous court quantities to a [`DiscreteState`].
//!
//! Positions are bucketed with `floor(position / (extent / divisions))` and
//! clamped into `[0, divisions - 1]`, so values that overshoot the court for
//! a tick still land in the edge bucket. Velocities keep only their sign.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{DiscreteState, GRID_X_DIVISIONS, GRID_Y_DIVISIONS, PADDLE_Y_DIVISIONS, VelocitySign},
};

/// Number of buckets per discretized axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGridConfig")]
pub struct GridConfig {
    ball_x_divisions: u16,
    ball_y_divisions: u16,
    paddle_divisions: u16,
}

impl GridConfig {
    /// Create a grid, rejecting axes with zero divisions.
    pub fn new(ball_x_divisions: u16, ball_y_divisions: u16, paddle_divisions: u16) -> Result<Self> {
        for (name, value) in [
            ("ball_x_divisions", ball_x_divisions),
            ("ball_y_divisions", ball_y_divisions),
            ("paddle_divisions", paddle_divisions),
        ] {
            if value == 0 {
                return Err(Error::ZeroDivisions { name });
            }
        }
        Ok(Self {
            ball_x_divisions,
            ball_y_divisions,
            paddle_divisions,
        })
    }

    pub fn ball_x_divisions(&self) -> u16 {
        self.ball_x_divisions
    }

    pub fn ball_y_divisions(&self) -> u16 {
        self.ball_y_divisions
    }

    pub fn paddle_divisions(&self) -> u16 {
        self.paddle_divisions
    }

    /// Upper bound on the number of distinct states this grid can produce.
    pub fn state_space_size(&self) -> usize {
        let x = self.ball_x_divisions as usize;
        let y = self.ball_y_divisions as usize;
        let p = self.paddle_divisions as usize;
        x * y * 3 * 3 * p * p
    }
}

#[derive(Deserialize)]
struct RawGridConfig {
    ball_x_divisions: u16,
    ball_y_divisions: u16,
    paddle_divisions: u16,
}

impl TryFrom<RawGridConfig> for GridConfig {
    type Error = Error;

    fn try_from(raw: RawGridConfig) -> Result<Self> {
        Self::new(raw.ball_x_divisions, raw.ball_y_divisions, raw.paddle_divisions)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            ball_x_divisions: GRID_X_DIVISIONS,
            ball_y_divisions: GRID_Y_DIVISIONS,
            paddle_divisions: PADDLE_Y_DIVISIONS,
        }
    }
}

/// Spatial extent of the court in simulation units.
///
/// Fields are public for reading; build values through [`CourtBounds::new`]
/// (deserialization goes through it too).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCourtBounds")]
pub struct CourtBounds {
    pub width: f32,
    pub height: f32,
}

impl CourtBounds {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(Error::InvalidBounds { width, height })
        }
    }
}

#[derive(Deserialize)]
struct RawCourtBounds {
    width: f32,
    height: f32,
}

impl TryFrom<RawCourtBounds> for CourtBounds {
    type Error = Error;

    fn try_from(raw: RawCourtBounds) -> Result<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl Default for CourtBounds {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Continuous quantities read off the simulation for one tick.
///
/// Paddle positions are the vertical centre of each paddle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Observation {
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_vx: f32,
    pub ball_vy: f32,
    pub controlled_paddle_y: f32,
    pub opponent_paddle_y: f32,
}

/// Stateless discretizer parameterised by a grid and the court bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Discretizer {
    grid: GridConfig,
    bounds: CourtBounds,
}

impl Discretizer {
    pub fn new(grid: GridConfig, bounds: CourtBounds) -> Self {
        Self { grid, bounds }
    }

    pub fn grid(&self) -> GridConfig {
        self.grid
    }

    pub fn bounds(&self) -> CourtBounds {
        self.bounds
    }

    /// Discretize one observation. Deterministic and side-effect free.
    pub fn discretize(&self, observation: &Observation) -> DiscreteState {
        let width = self.bounds.width;
        let height = self.bounds.height;
        DiscreteState::new(
            bucket(observation.ball_x, width, self.grid.ball_x_divisions),
            bucket(observation.ball_y, height, self.grid.ball_y_divisions),
            VelocitySign::of(observation.ball_vx),
            VelocitySign::of(observation.ball_vy),
            bucket(observation.controlled_paddle_y, height, self.grid.paddle_divisions),
            bucket(observation.opponent_paddle_y, height, self.grid.paddle_divisions),
        )
    }
}

/// Bucket index of `position` along an axis of length `extent`.
///
/// NaN positions fall into bucket 0.
pub fn bucket(position: f32, extent: f32, divisions: u16) -> u16 {
    let last = divisions.saturating_sub(1);
    let raw = (position / (extent / f32::from(divisions))).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= f32::from(last) {
        last
    } else {
        raw as u16
    }
}
