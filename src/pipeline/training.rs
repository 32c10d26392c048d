//! Training pipeline for the learning paddle

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    discretizer::Discretizer,
    pong::{ControllerKind, Rally, RallyConfig, Side},
    ports::Observer,
    q_learning::QLearningAgent,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of points to play
    pub num_points: usize,

    /// Simulated seconds per tick
    pub dt: f32,

    /// Ticks after which an undecided point is abandoned and the ball relaunched
    pub max_ticks_per_point: usize,

    /// Points needed to win a match; the score resets after each match
    pub points_to_win: u32,

    /// Side defended by the agent
    pub agent_side: Side,

    /// Opponent driving the other paddle
    pub opponent: ControllerKind,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_points: 100,
            dt: 1.0 / 60.0,
            max_ticks_per_point: 10_000,
            points_to_win: 10,
            agent_side: Side::Right,
            opponent: ControllerKind::Tracking,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Reject tick lengths and caps that would stall the match loop.
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("tick length must be positive, got {}", self.dt),
            });
        }
        if self.max_ticks_per_point == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_ticks_per_point must be at least 1".to_string(),
            });
        }
        if self.points_to_win == 0 {
            return Err(Error::InvalidConfiguration {
                message: "points_to_win must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Who took a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointWinner {
    Agent,
    Opponent,
    /// The tick cap was reached first.
    Unfinished,
}

/// Summary of one point, handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSummary {
    pub winner: PointWinner,
    pub ticks: usize,
    pub agent_returns: usize,
    pub reward: f64,
    pub agent_score: u32,
    pub opponent_score: u32,
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Points played, including unfinished ones
    pub total_points: usize,

    /// Points won by the agent
    pub agent_points: usize,

    /// Points won by the opponent
    pub opponent_points: usize,

    /// Points abandoned at the tick cap
    pub unfinished_points: usize,

    /// Times the agent returned the ball
    pub agent_returns: usize,

    /// Ticks simulated
    pub ticks: usize,

    /// Sum of all rewards the agent received
    pub total_reward: f64,

    /// States in the table at the end of the run
    pub explored_states: usize,

    /// Share of decided points won by the agent
    pub win_rate: f64,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for the learning agent against a scripted opponent
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Play `num_points` points, learning online, and report the totals.
    pub fn run(
        &mut self,
        agent: &mut QLearningAgent,
        discretizer: &Discretizer,
    ) -> Result<TrainingResult> {
        self.config.validate()?;
        let seed = self.config.seed;
        if let Some(seed) = seed {
            agent.set_rng_seed(seed);
        }
        let opponent = self.config.opponent.build(seed.map(|s| s.wrapping_add(1)));
        let mut rally = Rally::new(
            RallyConfig {
                points_to_win: self.config.points_to_win,
                agent_side: self.config.agent_side,
                ball_seed: seed.map(|s| s.wrapping_add(2)),
            },
            *discretizer,
            opponent,
        );

        log::info!(
            "training for {} points against {} ({})",
            self.config.num_points,
            rally.opponent_name(),
            agent.profile()
        );

        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_points)?;
        }

        let mut result = TrainingResult {
            total_points: 0,
            agent_points: 0,
            opponent_points: 0,
            unfinished_points: 0,
            agent_returns: 0,
            ticks: 0,
            total_reward: 0.0,
            explored_states: 0,
            win_rate: 0.0,
        };

        for point_num in 0..self.config.num_points {
            let summary = self.play_point(&mut rally, agent);

            match summary.winner {
                PointWinner::Agent => result.agent_points += 1,
                PointWinner::Opponent => result.opponent_points += 1,
                PointWinner::Unfinished => result.unfinished_points += 1,
            }
            result.total_points += 1;
            result.agent_returns += summary.agent_returns;
            result.ticks += summary.ticks;
            result.total_reward += summary.reward;

            for observer in &mut self.observers {
                observer.on_point_end(point_num, &summary)?;
            }

            if rally.is_over() {
                rally.restart(agent);
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let decided = result.agent_points + result.opponent_points;
        result.win_rate = if decided > 0 {
            result.agent_points as f64 / decided as f64
        } else {
            0.0
        };
        result.explored_states = agent.explored_state_count();

        log::info!(
            "training finished: agent {} - opponent {}, {} states explored",
            result.agent_points,
            result.opponent_points,
            result.explored_states
        );

        Ok(result)
    }

    fn play_point(&self, rally: &mut Rally, agent: &mut QLearningAgent) -> PointSummary {
        let mut ticks = 0;
        let mut agent_returns = 0;
        let mut reward = 0.0;
        let mut winner = PointWinner::Unfinished;

        while ticks < self.config.max_ticks_per_point {
            let outcome = rally.tick(agent, self.config.dt);
            ticks += 1;
            reward += outcome.reward;
            if outcome.events.agent_returned_ball {
                agent_returns += 1;
            }
            if let Some(side) = outcome.conceded {
                winner = if side == self.config.agent_side {
                    PointWinner::Opponent
                } else {
                    PointWinner::Agent
                };
                break;
            }
        }

        if winner == PointWinner::Unfinished {
            log::debug!("point abandoned after {ticks} ticks");
            rally.relaunch(agent);
        }

        PointSummary {
            winner,
            ticks,
            agent_returns,
            reward,
            agent_score: rally.agent_points(),
            opponent_score: rally.opponent_points(),
        }
    }
}
