//! Subcommands of the `pong-qlearn` binary

pub mod inspect;
pub mod train;
