//! Observer port - abstraction for training observation and data collection
//!
//! Observers receive a summary of every point played by the training
//! pipeline, keeping progress display and metrics out of the match loop.

use crate::{Result, pipeline::PointSummary};

/// Observer trait for monitoring training
///
/// Methods are called in order:
/// 1. `on_training_start(total_points)` - once
/// 2. `on_point_end(point_num, summary)` - after every point
/// 3. `on_training_end()` - once
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_points: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a point has been decided or hit the tick cap.
    fn on_point_end(&mut self, _point_num: usize, _summary: &PointSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
