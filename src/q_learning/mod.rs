//! Tabular Q-learning for the paddle agent
//!
//! The agent learns online, one tick at a time, with the one-step
//! off-policy TD rule:
//!
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//!
//! ## Pieces
//!
//! | Module | Role |
//! |--------|------|
//! | [`q_table`] | Sparse state → action-value table and the update rule |
//! | [`policy`] | ε-greedy action selection |
//! | [`difficulty`] | Named α/γ/ε profiles |
//! | [`agent`] | Two-phase agent owning table, profile and random source |
//! | [`serialization`] | Plain-text table persistence |
//!
//! ## Usage Example
//!
//! ```no_run
//! use pong_qlearn::q_learning::{Difficulty, QLearningAgent};
//!
//! let mut agent = QLearningAgent::new(Difficulty::Medium).with_seed(7);
//! if !agent.load("pong_q_table.dat") {
//!     // start from an empty table
//! }
//! // ... play ...
//! agent.save("pong_q_table.dat");
//! ```

pub mod agent;
pub mod difficulty;
pub mod policy;
pub mod q_table;
pub mod serialization;

pub use agent::QLearningAgent;
pub use difficulty::{Difficulty, DifficultyProfile};
pub use policy::{Selection, select_action};
pub use q_table::{ActionValues, QTable};
pub use serialization::LoadReport;
