//! Configuration types for agent creation.

use crate::{
    Result,
    discretizer::{CourtBounds, Discretizer, GridConfig},
    pong::Side,
    q_learning::{Difficulty, DifficultyProfile, QLearningAgent},
};

/// Configuration for creating a Q-learning paddle agent.
///
/// Builder-style API collecting everything needed to construct an agent and
/// the discretizer that produces its states.
///
/// # Examples
///
/// ```
/// use pong_qlearn::app::AgentConfig;
/// use pong_qlearn::q_learning::Difficulty;
///
/// let (agent, discretizer) = AgentConfig::new(Difficulty::Hard)
///     .with_seed(42)
///     .build()?;
/// assert_eq!(agent.epsilon(), 0.4);
/// assert_eq!(discretizer.grid().state_space_size(), 90_000);
/// # Ok::<(), pong_qlearn::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Named difficulty level
    pub difficulty: Difficulty,
    /// Overrides the difficulty's parameters when set
    pub profile: Option<DifficultyProfile>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Discretization grid
    pub grid: GridConfig,
    /// Court extents
    pub bounds: CourtBounds,
    /// Side of the court the agent defends
    pub side: Side,
}

impl AgentConfig {
    /// Create a new agent configuration at the given difficulty.
    ///
    /// Uses default values for other parameters:
    /// - Grid: 10×10 ball cells, 10 paddle cells
    /// - Court: 800×600
    /// - Side: right
    /// - Seed: None (non-deterministic)
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            profile: None,
            seed: None,
            grid: GridConfig::default(),
            bounds: CourtBounds::default(),
            side: Side::Right,
        }
    }

    /// Use custom learning parameters instead of the named profile.
    pub fn with_profile(mut self, profile: DifficultyProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_bounds(mut self, bounds: CourtBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Construct the agent and its discretizer.
    pub fn build(&self) -> Result<(QLearningAgent, Discretizer)> {
        let grid = GridConfig::new(
            self.grid.ball_x_divisions(),
            self.grid.ball_y_divisions(),
            self.grid.paddle_divisions(),
        )?;
        let bounds = CourtBounds::new(self.bounds.width, self.bounds.height)?;
        let discretizer = Discretizer::new(grid, bounds);

        let mut agent = QLearningAgent::new(self.difficulty);
        if let Some(profile) = self.profile {
            let profile = DifficultyProfile::custom(profile.alpha, profile.gamma, profile.epsilon)?;
            agent = agent.with_profile(profile);
        }
        if let Some(seed) = self.seed {
            agent = agent.with_seed(seed);
        }
        Ok((agent, discretizer))
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}
