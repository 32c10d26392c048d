//! CLI infrastructure for the Pong Q-learning agent
//!
//! This module provides the command-line interface for training the agent
//! headlessly and inspecting saved Q-tables.

pub mod commands;
pub mod output;
