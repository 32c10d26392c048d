//! Online tabular Q-learning for a Pong paddle
//!
//! This crate provides:
//! - State discretization of the continuous court into a compact grid
//! - A sparse Q-table with the one-step Q-learning update
//! - An ε-greedy agent with named difficulty profiles and text persistence
//! - Event-based reward shaping for returns, concedes and wasted moves
//! - A headless Pong simulation and training pipeline to exercise the agent

pub mod app;
pub mod cli;
pub mod discretizer;
pub mod error;
pub mod pipeline;
pub mod pong;
pub mod ports;
pub mod q_learning;
pub mod reward;
pub mod types;

pub use discretizer::{CourtBounds, Discretizer, GridConfig, Observation};
pub use error::{Error, Result};
pub use q_learning::{Difficulty, DifficultyProfile, LoadReport, QLearningAgent, QTable};
pub use reward::{ScoreEvent, StepEvents};
pub use types::{Action, DiscreteState, VelocitySign};
