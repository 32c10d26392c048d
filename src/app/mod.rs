//! Application layer: assembling agents from configuration.
//!
//! # Usage
//!
//! ```
//! use pong_qlearn::app::AgentConfig;
//! use pong_qlearn::pipeline::{TrainingConfig, TrainingPipeline};
//! use pong_qlearn::q_learning::Difficulty;
//!
//! let (mut agent, discretizer) = AgentConfig::new(Difficulty::Medium).with_seed(42).build()?;
//! let config = TrainingConfig {
//!     num_points: 1,
//!     seed: Some(42),
//!     ..TrainingConfig::default()
//! };
//! let result = TrainingPipeline::new(config).run(&mut agent, &discretizer)?;
//! assert_eq!(result.total_points, 1);
//! # Ok::<(), pong_qlearn::Error>(())
//! ```

pub mod config;

pub use config::AgentConfig;
