//! Ports (trait boundaries) between the simulation core and its drivers.

pub mod controller;
pub mod observer;

pub use controller::{CourtView, PaddleController};
pub use observer::Observer;
